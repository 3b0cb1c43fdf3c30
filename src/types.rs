use serde::Serialize;

/// Pagination metadata matching the list-query contract: total count,
/// page size, current/last page, and 1-based first/last item index.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// One page of results plus its metadata.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, per_page: i64, current_page: i64) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        let from = if items.is_empty() {
            None
        } else {
            Some((current_page - 1) * per_page + 1)
        };
        let to = from.map(|f| f + items.len() as i64 - 1);

        Self {
            items,
            meta: PageMeta {
                total,
                per_page,
                current_page,
                last_page,
                from,
                to,
            },
        }
    }
}
