use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Collection a media asset belongs to. `images` holds many assets per room,
/// `thumbnail` holds at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCollection {
    Images,
    Thumbnail,
}

impl MediaCollection {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaCollection::Images => "images",
            MediaCollection::Thumbnail => "thumbnail",
        }
    }

    pub fn is_singular(self) -> bool {
        matches!(self, MediaCollection::Thumbnail)
    }
}

/// A stored media asset record. The original file and its derived variants
/// live on disk under the media storage root, keyed by `id`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MediaAsset {
    pub id: Uuid,
    pub room_id: Uuid,
    pub collection: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Record for a freshly processed upload. The id is assigned before the
/// variant files are written so the disk layout and the row stay in step.
#[derive(Debug, Clone)]
pub struct NewMediaAsset {
    pub id: Uuid,
    pub room_id: Uuid,
    pub collection: MediaCollection,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

/// Media representation returned to callers.
#[derive(Debug, Serialize)]
pub struct MediaView {
    pub id: Uuid,
    pub url: String,
    pub thumbnail_url: String,
    pub preview_url: String,
}
