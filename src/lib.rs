//! IPTV catalogue server
//!
//! Parses M3U playlists, classifies each entry as live / movie / series
//! (plus a radio flag), and keeps a per-source catalogue in PostgreSQL.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::services::{
    catalogue::RecordDefaults, catalogue_store::CatalogueStore, fetcher::PlaylistFetcher,
    ingest::IngestService,
};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub store: CatalogueStore,
    pub ingest: IngestService,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        let fetcher =
            PlaylistFetcher::from_config(&config).context("failed to build HTTP client")?;
        let ingest = IngestService::new(pool.clone(), fetcher, RecordDefaults::from_config(&config));

        Ok(Self {
            store: CatalogueStore::new(pool.clone()),
            ingest,
            config,
            pool,
            start_time: Instant::now(),
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // Playlists are posted whole; the JSON extractor's default limit is far too small
    let body_limit = usize::try_from(state.config.max_m3u_bytes()).unwrap_or(usize::MAX);

    Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/ready", get(routes::health::ready))
        .route("/live", get(routes::health::live))
        // Interactive parsing
        .route("/api/playlist/parse", post(routes::playlist::parse_playlist))
        // Sources
        .route(
            "/api/lists",
            get(routes::lists::get_lists).post(routes::lists::create_list),
        )
        .route(
            "/api/lists/:id",
            get(routes::lists::get_list)
                .patch(routes::lists::update_list)
                .delete(routes::lists::delete_list),
        )
        .route("/api/lists/:id/toggle", post(routes::lists::toggle_list))
        .route("/api/lists/:id/refresh", post(routes::lists::refresh_list))
        // Catalogue
        .route("/api/lists/:id/content", get(routes::content::get_content))
        .route("/api/lists/:id/search", get(routes::content::search_content))
        .route("/api/content", get(routes::content::get_user_content))
        // Favorites
        .route(
            "/api/favorites",
            get(routes::favorites::get_favorites).post(routes::favorites::add_favorite),
        )
        .route("/api/favorites/toggle", post(routes::favorites::toggle_favorite))
        .route(
            "/api/favorites/:content_id",
            get(routes::favorites::get_favorite).delete(routes::favorites::remove_favorite),
        )
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
