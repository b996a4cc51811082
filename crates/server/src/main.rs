//! cinecache server entry point.
//!
//! Boots the HTTP server exposing `GET /search` over the SQLite-backed cache
//! and the TMDB search client. Logs are JSON on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use cinecache_client::{TmdbClient, TmdbConfig};
use cinecache_core::{AppConfig, CacheDb, CacheRepository, SystemClock};
use tracing_subscriber::EnvFilter;

use crate::routes::AppState;
use crate::search::{ResolveSettings, SearchService};

mod error;
mod routes;
mod search;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        db_path = %config.db_path.display(),
        bind_addr = %config.bind_addr,
        freshness_window_ms = config.freshness_window_ms,
        provider_retries = config.provider_retries,
        "Starting cinecache"
    );

    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache database at {}", config.db_path.display()))?;
    let tmdb = TmdbClient::new(TmdbConfig::from_app_config(&config)?)?;

    let service = SearchService::new(
        CacheRepository::new(Arc::new(db.clone())),
        Arc::new(tmdb),
        Arc::new(SystemClock),
        ResolveSettings::from_config(&config),
    );
    let app = routes::router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("shutting down, closing cache database");
    db.close().await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
