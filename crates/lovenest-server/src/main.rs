mod config;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use lovenest_api::AppStateInner;
use lovenest_store::{JsonFileStore, PhotoCatalog};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lovenest=debug,lovenest_api=debug,lovenest_store=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init storage
    let messages = JsonFileStore::open(&config.messages_path)?;
    let photos = PhotoCatalog::new(config.upload_dir.clone()).await?;

    let state = Arc::new(AppStateInner {
        messages: Box::new(messages),
        photos,
        start_date: config.start_date,
    });

    // Uploads are served from wherever they are stored, under the fixed URL prefix.
    let app = Router::new()
        .route_service("/", ServeFile::new(&config.index_path))
        .nest_service("/static/uploads", ServeDir::new(&config.upload_dir))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .merge(lovenest_api::router(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("Lovenest listening on {}", addr);
    info!("Counting days together from {}", config.start_date);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
