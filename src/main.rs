use std::env;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rooms_api::config;
use rooms_api::database::manager::DatabaseManager;
use rooms_api::database::PgListingStore;
use rooms_api::handlers::{self, protected, public};
use rooms_api::middleware::jwt_auth_middleware;
use rooms_api::services::{CatalogService, MediaService};
use rooms_api::state::AppState;

fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/rooms", get(public::rooms::rooms_index))
        .route("/rooms/:id", get(public::rooms::rooms_show));

    let room_routes = Router::new()
        .route(
            "/api/room",
            get(protected::rooms::room_index).post(protected::rooms::room_store),
        )
        .route(
            "/api/room/:id",
            get(protected::rooms::room_show)
                .put(protected::rooms::room_update)
                .delete(protected::rooms::room_destroy),
        )
        .route("/api/room/:id/images", post(protected::rooms::room_upload_images))
        .route("/api/room/:id/thumbnail", post(protected::rooms::room_set_thumbnail))
        .route(
            "/api/room/:room_id/images/:media_id",
            delete(protected::rooms::room_delete_image),
        )
        .route_layer(axum_middleware::from_fn(jwt_auth_middleware));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(public_routes)
        .merge(room_routes)
        // A multipart create can carry several 5MB images; the default 2MB
        // body limit is far too small.
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::config();
    tracing::info!(environment = ?config.environment, "Starting rooms-api");

    let pool = DatabaseManager::pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let store = Arc::new(PgListingStore::new(pool));
    let media = MediaService::new(
        config.media.storage_root.clone(),
        config.media.public_base_url.clone(),
        config.media.max_upload_bytes,
    );
    let state = AppState::new(CatalogService::new(store, media));

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
