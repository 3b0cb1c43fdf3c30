use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::FilterError;
use crate::database::models::{Room, RoomKind};

/// Raw query-parameter bag accepted by the list endpoints. Every key is
/// optional; unknown keys are dropped by serde. Values arrive as strings so
/// empty-string "absent" semantics can be applied before typing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub price: Option<String>,
    pub area: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_available: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListParams {
    /// Pagination keys are validated here rather than by the extractor so a
    /// malformed value gets the same error shape as any other bad filter.
    pub fn page(&self) -> Result<Option<i64>, FilterError> {
        parse_page("page", self.page.as_deref())
    }

    pub fn per_page(&self) -> Result<Option<i64>, FilterError> {
        parse_page("per_page", self.per_page.as_deref())
    }
}

/// Validated, typed filter over room attributes. All present keys combine
/// with logical AND; `search` is a case-insensitive substring match against
/// name OR description.
#[derive(Debug, Default, Clone)]
pub struct ListingFilter {
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub price: Option<Decimal>,
    pub area: Option<Decimal>,
    pub search: Option<String>,
    pub kind: Option<RoomKind>,
    pub is_available: Option<bool>,
}

impl ListingFilter {
    /// Compile the raw parameter bag into a typed filter, rejecting
    /// malformed values with per-field detail.
    pub fn from_params(params: &ListParams) -> Result<Self, FilterError> {
        Ok(Self {
            bedrooms: parse_int("bedrooms", params.bedrooms.as_deref())?,
            bathrooms: parse_int("bathrooms", params.bathrooms.as_deref())?,
            price: parse_decimal("price", params.price.as_deref())?,
            area: parse_decimal("area", params.area.as_deref())?,
            search: non_empty(params.search.as_deref()),
            kind: parse_kind(params.kind.as_deref())?,
            is_available: parse_bool("is_available", params.is_available.as_deref())?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.price.is_none()
            && self.area.is_none()
            && self.search.is_none()
            && self.kind.is_none()
            && self.is_available.is_none()
    }

    /// In-memory evaluation of the filter, used by the fake store. Mirrors
    /// the SQL predicate exactly.
    pub fn matches(&self, room: &Room) -> bool {
        if let Some(bedrooms) = self.bedrooms {
            if room.bedrooms != bedrooms {
                return false;
            }
        }
        if let Some(bathrooms) = self.bathrooms {
            if room.bathrooms != bathrooms {
                return false;
            }
        }
        if let Some(price) = self.price {
            if room.price != price {
                return false;
            }
        }
        if let Some(area) = self.area {
            if room.area != area {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if room.kind != kind.as_str() {
                return false;
            }
        }
        if let Some(is_available) = self.is_available {
            if room.is_available != is_available {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            let in_name = room.name.to_lowercase().contains(&needle);
            let in_description = room.description.to_lowercase().contains(&needle);
            if !in_name && !in_description {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    match value {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

fn parse_int(field: &str, value: Option<&str>) -> Result<Option<i32>, FilterError> {
    match non_empty(value) {
        None => Ok(None),
        Some(s) => s
            .parse::<i32>()
            .map(Some)
            .map_err(|_| FilterError::invalid(field, "must be an integer")),
    }
}

fn parse_page(field: &str, value: Option<&str>) -> Result<Option<i64>, FilterError> {
    match non_empty(value) {
        None => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| FilterError::invalid(field, "must be an integer")),
    }
}

fn parse_decimal(field: &str, value: Option<&str>) -> Result<Option<Decimal>, FilterError> {
    match non_empty(value) {
        None => Ok(None),
        Some(s) => s
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| FilterError::invalid(field, "must be a number")),
    }
}

fn parse_kind(value: Option<&str>) -> Result<Option<RoomKind>, FilterError> {
    match non_empty(value) {
        None => Ok(None),
        Some(s) => RoomKind::parse(&s)
            .map(Some)
            .ok_or_else(|| FilterError::invalid("type", "must be one of: rent, sale")),
    }
}

fn parse_bool(field: &str, value: Option<&str>) -> Result<Option<bool>, FilterError> {
    match non_empty(value) {
        None => Ok(None),
        Some(s) => coerce_bool(&s)
            .map(Some)
            .ok_or_else(|| FilterError::invalid(field, "must be a boolean")),
    }
}

/// Canonical boolean coercion for request values. The catalog stores
/// availability as a plain bool; accepted spellings are the usual form
/// inputs.
pub fn coerce_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
