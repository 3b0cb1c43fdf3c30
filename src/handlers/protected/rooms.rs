//! Authenticated room management. The JWT middleware has already placed a
//! `Principal` in the request extensions; the catalog service enforces the
//! admin gate on every mutation.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::Extension;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::filter::{Audience, ListParams};
use crate::middleware::ApiResponse;
use crate::state::AppState;

use super::form::RoomForm;

/// GET /api/room
pub async fn room_index(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse, ApiError> {
    let audience = Audience::for_principal(Some(&principal));
    let page = state.catalog.list_rooms(&params, audience).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/room/:id
pub async fn room_show(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse, ApiError> {
    let audience = Audience::for_principal(Some(&principal));
    let room = state.catalog.get_room(id, audience).await?;
    Ok(ApiResponse::success(room))
}

/// POST /api/room — multipart fields plus optional `images` parts.
pub async fn room_store(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    multipart: Multipart,
) -> Result<ApiResponse, ApiError> {
    let form = RoomForm::from_multipart(multipart).await?;
    let draft = form.to_draft()?;
    let room = state
        .catalog
        .create_room(&principal, draft, form.images)
        .await?;
    Ok(ApiResponse::created(room))
}

/// PUT /api/room/:id — full replace; image changes go through the
/// dedicated media endpoints.
pub async fn room_update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ApiResponse, ApiError> {
    let form = RoomForm::from_multipart(multipart).await?;
    let draft = form.to_draft()?;
    let room = state.catalog.update_room(&principal, id, draft).await?;
    Ok(ApiResponse::success(room))
}

/// DELETE /api/room/:id
pub async fn room_destroy(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse, ApiError> {
    state.catalog.delete_room(&principal, id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /api/room/:id/images
pub async fn room_upload_images(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ApiResponse, ApiError> {
    let form = RoomForm::from_multipart(multipart).await?;
    if form.images.is_empty() {
        let mut errors = HashMap::new();
        errors.insert("images".to_string(), "Images are required".to_string());
        return Err(ApiError::validation_error("Images are required", Some(errors)));
    }
    let room = state
        .catalog
        .upload_images(&principal, id, form.images)
        .await?;
    Ok(ApiResponse::success(room))
}

/// POST /api/room/:id/thumbnail — single `thumbnail` part replaces any
/// existing one.
pub async fn room_set_thumbnail(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ApiResponse, ApiError> {
    let form = RoomForm::from_multipart(multipart).await?;
    let thumbnail = form.thumbnail.ok_or_else(|| {
        let mut errors = HashMap::new();
        errors.insert("thumbnail".to_string(), "Thumbnail is required".to_string());
        ApiError::validation_error("Thumbnail is required", Some(errors))
    })?;
    let room = state
        .catalog
        .set_thumbnail(&principal, id, thumbnail)
        .await?;
    Ok(ApiResponse::success(room))
}

/// DELETE /api/room/:room_id/images/:media_id
pub async fn room_delete_image(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((room_id, media_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiResponse, ApiError> {
    state
        .catalog
        .delete_image(&principal, room_id, media_id)
        .await?;
    Ok(ApiResponse::no_content())
}
