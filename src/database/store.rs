use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{MediaAsset, NewMediaAsset, Room, RoomAttrs};
use crate::filter::{Audience, ListingFilter};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    /// Uniqueness violation, including the race lost to the database-level
    /// unique index after the service pre-check passed.
    #[error("Duplicate value for {field}")]
    Duplicate { field: &'static str },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A fully scoped list query: compiled filter, caller visibility, and page
/// window. Each store interprets it against its own backend.
#[derive(Debug, Clone)]
pub struct RoomQuery {
    pub filter: ListingFilter,
    pub audience: Audience,
    pub per_page: i64,
    pub page: i64,
}

impl RoomQuery {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Persistence interface for room records and their media rows. Soft-deleted
/// rooms are invisible to every operation here.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert(&self, owner_id: Option<Uuid>, attrs: RoomAttrs) -> Result<Room, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Room>, StoreError>;

    /// Full-replace update. Fails with NotFound if the room is absent or
    /// soft-deleted, Duplicate if the new name collides with another room.
    async fn update(&self, id: Uuid, attrs: RoomAttrs) -> Result<Room, StoreError>;

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Returns the requested page in stable insertion order together with
    /// the total row count for the query.
    async fn list(&self, query: &RoomQuery) -> Result<(Vec<Room>, i64), StoreError>;

    /// Early-validation name check; the partial unique index is the
    /// authoritative guard.
    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, StoreError>;

    async fn attach_media(&self, asset: NewMediaAsset) -> Result<MediaAsset, StoreError>;

    async fn media_for_room(&self, room_id: Uuid) -> Result<Vec<MediaAsset>, StoreError>;

    async fn media_for_rooms(&self, room_ids: &[Uuid]) -> Result<Vec<MediaAsset>, StoreError>;

    async fn find_media(&self, room_id: Uuid, media_id: Uuid) -> Result<Option<MediaAsset>, StoreError>;

    async fn delete_media(&self, media_id: Uuid) -> Result<(), StoreError>;
}
