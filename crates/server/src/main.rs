//! # apptmerge-server
//!
//! HTTP front end: upload two spreadsheets, view the merged rows, download
//! them as `.xlsx`. Each successful upload is stored under its own token.

mod config;
mod routes;
mod store;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use config::ServerConfig;
use routes::AppState;
use store::ResultStore;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(config: &ServerConfig) -> Router {
    let state = AppState {
        store: ResultStore::new(config.max_results),
    };

    Router::new()
        .route("/", get(routes::index))
        .route("/upload", post(routes::upload))
        .route("/results/:token", get(routes::results))
        .route("/download/:token", get(routes::download))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();
    let app = create_router(&config);

    tracing::info!(
        bind = %config.bind,
        max_results = config.max_results,
        max_upload_mb = config.max_upload_mb,
        "apptmerge-server listening"
    );

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
