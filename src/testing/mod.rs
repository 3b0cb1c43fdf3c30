//! Test doubles and fixtures. `MemoryListingStore` implements the store
//! contract over plain vectors so service behavior is testable without a
//! running database.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use image::{DynamicImage, ImageFormat, RgbImage};
use tempfile::TempDir;
use uuid::Uuid;

use jsonwebtoken::{encode, EncodingKey, Header};

use crate::auth::{Claims, Principal, Role};
use crate::config;
use crate::database::models::{MediaAsset, NewMediaAsset, Room, RoomAttrs, RoomDraft, RoomKind};
use crate::database::store::{ListingStore, RoomQuery, StoreError};
use crate::services::{CatalogService, MediaService, UploadedImage};

#[derive(Default)]
struct Inner {
    rooms: Vec<Room>,
    media: Vec<MediaAsset>,
}

/// In-memory store with the same observable behavior as the Postgres one:
/// soft-deleted rows are invisible, live names are unique, list order is
/// stable insertion order.
#[derive(Default)]
pub struct MemoryListingStore {
    inner: Mutex<Inner>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn name_collides(inner: &Inner, name: &str, exclude: Option<Uuid>) -> bool {
        inner.rooms.iter().any(|r| {
            r.deleted_at.is_none() && r.name == name && Some(r.id) != exclude
        })
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn insert(&self, owner_id: Option<Uuid>, attrs: RoomAttrs) -> Result<Room, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        // Re-check under the lock, like the partial unique index does.
        if Self::name_collides(&inner, &attrs.name, None) {
            return Err(StoreError::Duplicate { field: "name" });
        }
        let now = Utc::now();
        let room = Room {
            id: Uuid::new_v4(),
            owner_id,
            name: attrs.name,
            address: attrs.address,
            description: attrs.description,
            bedrooms: attrs.bedrooms,
            bathrooms: attrs.bathrooms,
            price: attrs.price,
            area: attrs.area,
            kind: attrs.kind,
            is_available: attrs.is_available,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.rooms.push(room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Room>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rooms
            .iter()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .cloned())
    }

    async fn update(&self, id: Uuid, attrs: RoomAttrs) -> Result<Room, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if Self::name_collides(&inner, &attrs.name, Some(id)) {
            return Err(StoreError::Duplicate { field: "name" });
        }
        let room = inner
            .rooms
            .iter_mut()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .ok_or(StoreError::NotFound)?;
        room.name = attrs.name;
        room.address = attrs.address;
        room.description = attrs.description;
        room.bedrooms = attrs.bedrooms;
        room.bathrooms = attrs.bathrooms;
        room.price = attrs.price;
        room.area = attrs.area;
        room.kind = attrs.kind;
        room.is_available = attrs.is_available;
        room.updated_at = Utc::now();
        Ok(room.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let room = inner
            .rooms
            .iter_mut()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .ok_or(StoreError::NotFound)?;
        room.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn list(&self, query: &RoomQuery) -> Result<(Vec<Room>, i64), StoreError> {
        let inner = self.inner.lock().unwrap();
        let matching: Vec<Room> = inner
            .rooms
            .iter()
            .filter(|r| r.deleted_at.is_none())
            .filter(|r| query.audience.sees_unavailable() || r.is_available)
            .filter(|r| query.filter.matches(r))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.per_page as usize)
            .collect();
        Ok((page, total))
    }

    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(Self::name_collides(&inner, name, exclude))
    }

    async fn attach_media(&self, asset: NewMediaAsset) -> Result<MediaAsset, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let position = inner
            .media
            .iter()
            .filter(|m| m.room_id == asset.room_id && m.collection == asset.collection.as_str())
            .map(|m| m.position)
            .max()
            .map_or(0, |p| p + 1);
        let record = MediaAsset {
            id: asset.id,
            room_id: asset.room_id,
            collection: asset.collection.as_str().to_string(),
            file_name: asset.file_name,
            mime_type: asset.mime_type,
            size_bytes: asset.size_bytes,
            position,
            created_at: Utc::now(),
        };
        inner.media.push(record.clone());
        Ok(record)
    }

    async fn media_for_room(&self, room_id: Uuid) -> Result<Vec<MediaAsset>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .media
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn media_for_rooms(&self, room_ids: &[Uuid]) -> Result<Vec<MediaAsset>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .media
            .iter()
            .filter(|m| room_ids.contains(&m.room_id))
            .cloned()
            .collect())
    }

    async fn find_media(
        &self,
        room_id: Uuid,
        media_id: Uuid,
    ) -> Result<Option<MediaAsset>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .media
            .iter()
            .find(|m| m.room_id == room_id && m.id == media_id)
            .cloned())
    }

    async fn delete_media(&self, media_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.media.len();
        inner.media.retain(|m| m.id != media_id);
        if inner.media.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Catalog service over the in-memory store with media storage in a
/// temporary directory. The directory is dropped with the returned guard.
pub fn catalog() -> (CatalogService, Arc<MemoryListingStore>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryListingStore::new());
    let media = MediaService::new(
        dir.path().to_path_buf(),
        "http://localhost:3000".to_string(),
        5 * 1024 * 1024,
    );
    let service = CatalogService::new(store.clone(), media);
    (service, store, dir)
}

pub fn admin() -> Principal {
    Principal {
        id: Uuid::new_v4(),
        role: Role::Admin,
    }
}

pub fn user() -> Principal {
    Principal {
        id: Uuid::new_v4(),
        role: Role::User,
    }
}

/// Mint a signed token for middleware tests; the service itself only
/// verifies tokens, it never issues them.
pub fn issue_jwt(user_id: Uuid, role: Role) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        role,
        exp: (now + chrono::Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };
    let secret = &config::config().security.jwt_secret;
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn draft(name: &str) -> RoomDraft {
    RoomDraft {
        name: name.to_string(),
        address: "1 Main St".to_string(),
        description: None,
        bedrooms: 1,
        bathrooms: 1,
        price: "1000".parse().unwrap(),
        area: "50".parse().unwrap(),
        kind: RoomKind::Rent,
        is_available: None,
    }
}

pub fn room_fixture(name: &str) -> Room {
    let now = Utc::now();
    Room {
        id: Uuid::new_v4(),
        owner_id: None,
        name: name.to_string(),
        address: "1 Main St".to_string(),
        description: String::new(),
        bedrooms: 1,
        bathrooms: 1,
        price: "1000".parse().unwrap(),
        area: "50".parse().unwrap(),
        kind: "rent".to_string(),
        is_available: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn media_fixture(file_name: &str) -> MediaAsset {
    MediaAsset {
        id: Uuid::new_v4(),
        room_id: Uuid::new_v4(),
        collection: "images".to_string(),
        file_name: file_name.to_string(),
        mime_type: "image/png".to_string(),
        size_bytes: 1234,
        position: 0,
        created_at: Utc::now(),
    }
}

/// A small valid PNG, encoded in memory.
pub fn png_bytes() -> Vec<u8> {
    let mut image = RgbImage::new(64, 48);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        *pixel = image::Rgb([(x * 4) as u8, (y * 5) as u8, 128]);
    }
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

pub fn png_upload(file_name: &str) -> UploadedImage {
    UploadedImage {
        file_name: file_name.to_string(),
        content_type: "image/png".to_string(),
        bytes: png_bytes(),
    }
}
