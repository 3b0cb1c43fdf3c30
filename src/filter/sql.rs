//! Compiles a [`ListingFilter`] plus the caller's visibility into a
//! parameterized WHERE fragment for the Postgres store.

use rust_decimal::Decimal;

use super::listing_filter::ListingFilter;
use super::visibility::Audience;

/// A bind parameter for the generated SQL, tagged with its Rust type so the
/// store can call the matching `bind`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    Decimal(Decimal),
    Text(String),
    Bool(bool),
}

/// WHERE clause (without the `WHERE` keyword) and its `$n` parameters.
#[derive(Debug, Clone)]
pub struct SqlPredicate {
    pub clause: String,
    pub params: Vec<SqlParam>,
}

/// Build the row predicate: soft-delete scoping always applies, the
/// availability restriction applies for public callers, and each present
/// filter key contributes one AND'd condition.
pub fn compile(filter: &ListingFilter, audience: Audience) -> SqlPredicate {
    let mut builder = WhereBuilder::new();

    builder.raw("\"deleted_at\" IS NULL");
    if !audience.sees_unavailable() {
        builder.raw("\"is_available\" = TRUE");
    }

    if let Some(bedrooms) = filter.bedrooms {
        builder.eq("bedrooms", SqlParam::Int(bedrooms));
    }
    if let Some(bathrooms) = filter.bathrooms {
        builder.eq("bathrooms", SqlParam::Int(bathrooms));
    }
    if let Some(price) = filter.price {
        builder.eq("price", SqlParam::Decimal(price));
    }
    if let Some(area) = filter.area {
        builder.eq("area", SqlParam::Decimal(area));
    }
    if let Some(kind) = filter.kind {
        builder.eq("kind", SqlParam::Text(kind.as_str().to_string()));
    }
    if let Some(is_available) = filter.is_available {
        builder.eq("is_available", SqlParam::Bool(is_available));
    }
    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", search.to_lowercase());
        let name_param = builder.param(SqlParam::Text(pattern.clone()));
        let description_param = builder.param(SqlParam::Text(pattern));
        builder.raw_owned(format!(
            "(LOWER(\"name\") LIKE {} OR LOWER(\"description\") LIKE {})",
            name_param, description_param
        ));
    }

    builder.finish()
}

struct WhereBuilder {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl WhereBuilder {
    fn new() -> Self {
        Self {
            conditions: vec![],
            params: vec![],
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn eq(&mut self, column: &str, value: SqlParam) {
        let placeholder = self.param(value);
        self.conditions.push(format!("\"{}\" = {}", column, placeholder));
    }

    fn raw(&mut self, condition: &str) {
        self.conditions.push(condition.to_string());
    }

    fn raw_owned(&mut self, condition: String) {
        self.conditions.push(condition);
    }

    fn finish(self) -> SqlPredicate {
        let clause = if self.conditions.is_empty() {
            "1=1".to_string()
        } else {
            self.conditions.join(" AND ")
        };
        SqlPredicate {
            clause,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::RoomKind;

    #[test]
    fn empty_filter_for_admin_scopes_soft_deletes_only() {
        let predicate = compile(&ListingFilter::default(), Audience::Admin);
        assert_eq!(predicate.clause, "\"deleted_at\" IS NULL");
        assert!(predicate.params.is_empty());
    }

    #[test]
    fn public_audience_forces_availability_before_anything_else() {
        let predicate = compile(&ListingFilter::default(), Audience::Public);
        assert_eq!(
            predicate.clause,
            "\"deleted_at\" IS NULL AND \"is_available\" = TRUE"
        );
    }

    #[test]
    fn exact_match_keys_become_positional_equality() {
        let filter = ListingFilter {
            bedrooms: Some(2),
            kind: Some(RoomKind::Rent),
            ..Default::default()
        };
        let predicate = compile(&filter, Audience::Admin);
        assert_eq!(
            predicate.clause,
            "\"deleted_at\" IS NULL AND \"bedrooms\" = $1 AND \"kind\" = $2"
        );
        assert_eq!(
            predicate.params,
            vec![SqlParam::Int(2), SqlParam::Text("rent".to_string())]
        );
    }

    #[test]
    fn search_generates_one_or_group_with_two_params() {
        let filter = ListingFilter {
            search: Some("Luxury".to_string()),
            ..Default::default()
        };
        let predicate = compile(&filter, Audience::Admin);
        assert_eq!(
            predicate.clause,
            "\"deleted_at\" IS NULL AND (LOWER(\"name\") LIKE $1 OR LOWER(\"description\") LIKE $2)"
        );
        assert_eq!(
            predicate.params,
            vec![
                SqlParam::Text("%luxury%".to_string()),
                SqlParam::Text("%luxury%".to_string())
            ]
        );
    }

    #[test]
    fn search_is_anded_with_other_filters() {
        let filter = ListingFilter {
            bathrooms: Some(1),
            search: Some("condo".to_string()),
            ..Default::default()
        };
        let predicate = compile(&filter, Audience::Public);
        assert_eq!(
            predicate.clause,
            "\"deleted_at\" IS NULL AND \"is_available\" = TRUE AND \"bathrooms\" = $1 \
             AND (LOWER(\"name\") LIKE $2 OR LOWER(\"description\") LIKE $3)"
        );
    }
}
