use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::media::MediaView;

/// Whether a room is offered for rent or for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Rent,
    Sale,
}

impl RoomKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomKind::Rent => "rent",
            RoomKind::Sale => "sale",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rent" => Some(RoomKind::Rent),
            "sale" => Some(RoomKind::Sale),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoomKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A room row as persisted. `deleted_at` set means the row is logically
/// absent from every normal query.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Room {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub description: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub price: Decimal,
    pub area: Decimal,
    pub kind: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Validated room attributes from the request boundary. Optional fields keep
/// their "absent" state so create/update can apply the documented defaults.
#[derive(Debug, Clone)]
pub struct RoomDraft {
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub price: Decimal,
    pub area: Decimal,
    pub kind: RoomKind,
    pub is_available: Option<bool>,
}

/// Fully resolved attribute set handed to the store. Both create and update
/// use it: updates are full-replace, so absent optionals reset to defaults
/// (empty description, available).
#[derive(Debug, Clone)]
pub struct RoomAttrs {
    pub name: String,
    pub address: String,
    pub description: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub price: Decimal,
    pub area: Decimal,
    pub kind: String,
    pub is_available: bool,
}

impl From<RoomDraft> for RoomAttrs {
    fn from(draft: RoomDraft) -> Self {
        Self {
            name: draft.name,
            address: draft.address,
            description: draft.description.unwrap_or_default(),
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            price: draft.price,
            area: draft.area,
            kind: draft.kind.as_str().to_string(),
            is_available: draft.is_available.unwrap_or(true),
        }
    }
}

/// A room as exposed to a caller. The visibility projector decides whether
/// the role-restricted fields are present at all.
#[derive(Debug, Serialize)]
pub struct RoomView {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub description: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub price: Decimal,
    pub area: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub media: Vec<MediaView>,
}
