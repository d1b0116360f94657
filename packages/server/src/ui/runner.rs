//! Server wiring: state, router and the serve loop.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    config::ServerConfig,
    domain::{MediaStore, ScheduledRoom, Sticker, StickerIdFactory},
    error::ServerError,
    infrastructure::{
        media::LocalMediaStore,
        repository::{
            InMemoryCatalogRepository, InMemoryConnectionRepository, InMemoryRoomRepository,
        },
    },
};

use super::{
    handler::{
        add_sticker, get_room_detail, get_rooms, health_check, upload_attachment,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Public path of attachment blobs
pub const UPLOADS_PATH: &str = "/uploads";
/// Public path of sticker blobs
pub const STICKERS_PATH: &str = "/stickers";

/// Open the media stores and build the registries.
///
/// Sticker images already on disk are loaded into the Sticker Registry
/// with fresh ids.
pub async fn build_state(config: &ServerConfig) -> Result<Arc<AppState>, ServerError> {
    let uploads = Arc::new(LocalMediaStore::open(&config.upload_dir, UPLOADS_PATH).await?);
    let sticker_store =
        Arc::new(LocalMediaStore::open(&config.sticker_dir, STICKERS_PATH).await?);

    let seeded: Vec<Sticker> = sticker_store
        .list()
        .await?
        .into_iter()
        .map(|url| Sticker::new(StickerIdFactory::generate(), url))
        .collect();
    tracing::info!(
        "Loaded {} stickers from {}",
        seeded.len(),
        config.sticker_dir.display()
    );

    let connections = Arc::new(InMemoryConnectionRepository::new());
    Ok(Arc::new(AppState {
        rooms: Arc::new(InMemoryRoomRepository::new()),
        connections: connections.clone(),
        stickers: Arc::new(InMemoryCatalogRepository::with_entries(
            seeded,
            connections.clone(),
        )),
        scheduled_rooms: Arc::new(InMemoryCatalogRepository::<ScheduledRoom>::new(connections)),
        uploads,
        sticker_store,
        max_upload_bytes: config.max_upload_bytes,
        max_sticker_bytes: config.max_sticker_bytes,
    }))
}

/// Build the axum router
pub fn build_app(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let body_limit = config.max_upload_bytes.max(config.max_sticker_bytes);

    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{name}", get(get_room_detail))
        .route("/api/upload", post(upload_attachment))
        .route("/api/stickers", post(add_sticker))
        .with_state(state)
        .nest_service(UPLOADS_PATH, ServeDir::new(&config.upload_dir))
        .nest_service(STICKERS_PATH, ServeDir::new(&config.sticker_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Run the server until Ctrl-C or SIGTERM
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = build_state(&config).await?;
    let app = build_app(state, &config);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
