//! Catalog orchestration: composes the filter compiler, visibility
//! projector, listing store, and media manager behind the list/get/mutation
//! entry points. Every mutating operation passes the admin gate first.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{require_admin, Principal};
use crate::config;
use crate::database::models::{MediaCollection, MediaView, NewMediaAsset, Room, RoomDraft, RoomView};
use crate::database::store::{ListingStore, RoomQuery};
use crate::error::ApiError;
use crate::filter::{Audience, ListParams, ListingFilter};
use crate::services::media_service::{MediaService, UploadedImage};
use crate::types::Page;

pub struct CatalogService {
    store: Arc<dyn ListingStore>,
    media: MediaService,
}

impl CatalogService {
    pub fn new(store: Arc<dyn ListingStore>, media: MediaService) -> Self {
        Self { store, media }
    }

    /// Paginated, filtered, role-scoped listing query. The visibility
    /// restriction is part of the row predicate, so unavailable rooms never
    /// leak into public page counts.
    pub async fn list_rooms(
        &self,
        params: &ListParams,
        audience: Audience,
    ) -> Result<Page<RoomView>, ApiError> {
        let api_config = &config::config().api;
        let filter = ListingFilter::from_params(params)?;
        let per_page = params
            .per_page()?
            .unwrap_or(api_config.default_per_page)
            .clamp(1, api_config.max_per_page);
        let page = params.page()?.unwrap_or(1).max(1);

        let query = RoomQuery {
            filter,
            audience,
            per_page,
            page,
        };
        let (rooms, total) = self.store.list(&query).await?;

        let room_ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
        let mut media_by_room: HashMap<Uuid, Vec<MediaView>> = HashMap::new();
        for asset in self.store.media_for_rooms(&room_ids).await? {
            media_by_room
                .entry(asset.room_id)
                .or_default()
                .push(self.media.view(&asset));
        }

        let views = rooms
            .iter()
            .map(|room| {
                let media = media_by_room.remove(&room.id).unwrap_or_default();
                audience.project(room, media)
            })
            .collect();

        Ok(Page::new(views, total, per_page, page))
    }

    pub async fn get_room(&self, id: Uuid, audience: Audience) -> Result<RoomView, ApiError> {
        let room = self.fetch_visible(id, audience).await?;
        let media = self.media_views(room.id).await?;
        Ok(audience.project(&room, media))
    }

    /// Create a room with optional images. Images are validated as a batch
    /// before any asset is written; a processing failure mid-batch leaves no
    /// image attached.
    pub async fn create_room(
        &self,
        principal: &Principal,
        draft: RoomDraft,
        images: Vec<UploadedImage>,
    ) -> Result<RoomView, ApiError> {
        require_admin(principal)?;

        if self.store.name_taken(&draft.name, None).await? {
            return Err(name_exists_error());
        }
        self.media.validate(&images).map_err(ApiError::from)?;

        let room = self
            .store
            .insert(Some(principal.id), draft.into())
            .await?;

        if !images.is_empty() {
            self.attach_batch(room.id, MediaCollection::Images, &images)
                .await?;
        }

        let media = self.media_views(room.id).await?;
        Ok(Audience::Admin.project(&room, media))
    }

    /// Full-replace update: absent optional fields reset to their defaults.
    pub async fn update_room(
        &self,
        principal: &Principal,
        id: Uuid,
        draft: RoomDraft,
    ) -> Result<RoomView, ApiError> {
        require_admin(principal)?;

        if self.store.name_taken(&draft.name, Some(id)).await? {
            return Err(name_exists_error());
        }

        let room = self.store.update(id, draft.into()).await.map_err(|e| {
            room_not_found_or(e)
        })?;

        let media = self.media_views(room.id).await?;
        Ok(Audience::Admin.project(&room, media))
    }

    /// Soft delete. The physical row and its media records stay in storage
    /// for audit; only visibility changes.
    pub async fn delete_room(&self, principal: &Principal, id: Uuid) -> Result<(), ApiError> {
        require_admin(principal)?;
        self.store.soft_delete(id).await.map_err(room_not_found_or)
    }

    pub async fn upload_images(
        &self,
        principal: &Principal,
        id: Uuid,
        images: Vec<UploadedImage>,
    ) -> Result<RoomView, ApiError> {
        require_admin(principal)?;

        let room = self.require_room(id).await?;
        self.media.validate(&images).map_err(ApiError::from)?;
        self.attach_batch(room.id, MediaCollection::Images, &images)
            .await?;

        let media = self.media_views(room.id).await?;
        Ok(Audience::Admin.project(&room, media))
    }

    /// Attach or replace the room's single thumbnail asset. The replacement
    /// is fully staged before the current thumbnail is touched; a failed
    /// replacement leaves the old one in place.
    pub async fn set_thumbnail(
        &self,
        principal: &Principal,
        id: Uuid,
        image: UploadedImage,
    ) -> Result<RoomView, ApiError> {
        require_admin(principal)?;

        let room = self.require_room(id).await?;
        self.media
            .validate(std::slice::from_ref(&image))
            .map_err(ApiError::from)?;

        let media_id = Uuid::new_v4();
        let file_name = match self.media.process(media_id, &image) {
            Ok(file_name) => file_name,
            Err(e) => {
                let _ = self.media.remove(media_id);
                return Err(e.into());
            }
        };
        let staged = NewMediaAsset {
            id: media_id,
            room_id: room.id,
            collection: MediaCollection::Thumbnail,
            file_name,
            mime_type: image.content_type.clone(),
            size_bytes: image.bytes.len() as i64,
        };

        let previous = self
            .store
            .media_for_room(room.id)
            .await?
            .into_iter()
            .find(|a| a.collection == MediaCollection::Thumbnail.as_str());

        // Swap records: the singular-thumbnail index means the old row must
        // go before the new one can exist.
        if let Some(old) = &previous {
            if let Err(e) = self.store.delete_media(old.id).await {
                let _ = self.media.remove(media_id);
                return Err(e.into());
            }
        }
        match self.store.attach_media(staged).await {
            Ok(_) => {
                if let Some(old) = previous {
                    let _ = self.media.remove(old.id);
                }
            }
            Err(e) => {
                let _ = self.media.remove(media_id);
                if let Some(old) = previous {
                    let _ = self
                        .store
                        .attach_media(NewMediaAsset {
                            id: old.id,
                            room_id: old.room_id,
                            collection: MediaCollection::Thumbnail,
                            file_name: old.file_name.clone(),
                            mime_type: old.mime_type.clone(),
                            size_bytes: old.size_bytes,
                        })
                        .await;
                }
                return Err(e.into());
            }
        }

        let media = self.media_views(room.id).await?;
        Ok(Audience::Admin.project(&room, media))
    }

    /// Remove one asset by id without touching its siblings.
    pub async fn delete_image(
        &self,
        principal: &Principal,
        room_id: Uuid,
        media_id: Uuid,
    ) -> Result<(), ApiError> {
        require_admin(principal)?;

        self.require_room(room_id).await?;
        let asset = self
            .store
            .find_media(room_id, media_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Image not found"))?;

        self.store.delete_media(asset.id).await?;
        self.media.remove(asset.id).map_err(ApiError::from)?;
        Ok(())
    }

    async fn require_room(&self, id: Uuid) -> Result<Room, ApiError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Room not found"))
    }

    /// Fetch a room applying the audience's row restriction: a public
    /// caller cannot observe an unavailable room even by id.
    async fn fetch_visible(&self, id: Uuid, audience: Audience) -> Result<Room, ApiError> {
        let room = self.require_room(id).await?;
        if !audience.sees_unavailable() && !room.is_available {
            return Err(ApiError::not_found("Room not found"));
        }
        Ok(room)
    }

    async fn media_views(&self, room_id: Uuid) -> Result<Vec<MediaView>, ApiError> {
        let assets = self.store.media_for_room(room_id).await?;
        Ok(assets.iter().map(|a| self.media.view(a)).collect())
    }

    /// Process then attach a validated batch. All variant files are written
    /// before the first record is attached; any failure unwinds files and
    /// records written so far, so callers never observe a partial batch.
    async fn attach_batch(
        &self,
        room_id: Uuid,
        collection: MediaCollection,
        images: &[UploadedImage],
    ) -> Result<(), ApiError> {
        let mut staged: Vec<NewMediaAsset> = Vec::with_capacity(images.len());
        for upload in images {
            let media_id = Uuid::new_v4();
            match self.media.process(media_id, upload) {
                Ok(file_name) => staged.push(NewMediaAsset {
                    id: media_id,
                    room_id,
                    collection,
                    file_name,
                    mime_type: upload.content_type.clone(),
                    size_bytes: upload.bytes.len() as i64,
                }),
                Err(e) => {
                    let _ = self.media.remove(media_id);
                    for asset in &staged {
                        let _ = self.media.remove(asset.id);
                    }
                    return Err(e.into());
                }
            }
        }

        let mut attached: Vec<Uuid> = Vec::with_capacity(staged.len());
        for asset in &staged {
            match self.store.attach_media(asset.clone()).await {
                Ok(_) => attached.push(asset.id),
                Err(e) => {
                    for id in attached {
                        let _ = self.store.delete_media(id).await;
                    }
                    for asset in &staged {
                        let _ = self.media.remove(asset.id);
                    }
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }
}

fn name_exists_error() -> ApiError {
    let mut field_errors = HashMap::new();
    field_errors.insert("name".to_string(), "Room name already exists".to_string());
    ApiError::validation_error("Room name already exists", Some(field_errors))
}

fn room_not_found_or(err: crate::database::store::StoreError) -> ApiError {
    match err {
        crate::database::store::StoreError::NotFound => ApiError::not_found("Room not found"),
        other => other.into(),
    }
}
