pub mod protected;
pub mod public;

use serde_json::json;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

pub async fn root() -> ApiResponse {
    ApiResponse::success(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health() -> Result<ApiResponse, ApiError> {
    DatabaseManager::health_check().await?;
    Ok(ApiResponse::success(json!({ "status": "healthy" })))
}
