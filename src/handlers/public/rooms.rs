//! Unauthenticated catalog browsing. Everything here runs with the public
//! audience: unavailable rooms and admin-only fields never appear.

use axum::extract::{Path, Query, State};
use uuid::Uuid;

use crate::error::ApiError;
use crate::filter::{Audience, ListParams};
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET /rooms
pub async fn rooms_index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse, ApiError> {
    let page = state.catalog.list_rooms(&params, Audience::Public).await?;
    Ok(ApiResponse::success(page))
}

/// GET /rooms/:id
pub async fn rooms_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse, ApiError> {
    let room = state.catalog.get_room(id, Audience::Public).await?;
    Ok(ApiResponse::success(room))
}
