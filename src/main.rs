// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::panel_service::PanelService;
use crate::infrastructure::asset_cache::FileAssetCache;
use crate::infrastructure::config::load_panel_config;
use crate::infrastructure::pegel_repository::PegelOnlineRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{chart, health_check, logo, panel, CHART_ROUTE, LOGO_ROUTE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_panel_config().context("Failed to load panel configuration")?;

    // Create repositories (infrastructure layer)
    let measurements = Arc::new(PegelOnlineRepository::new(
        config.station.api_base.clone(),
        config.station.lookback.clone(),
    ));
    let assets = Arc::new(FileAssetCache::new(
        config.assets.cache_dir.clone(),
        config.assets.cdn_base.clone(),
    ));

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    let station = config.station.id.clone();

    // Create services (application layer)
    let panel_service = PanelService::new(measurements, assets, config);
    let state = Arc::new(AppState { panel_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/panel", get(panel))
        .route(CHART_ROUTE, get(chart))
        .route(LOGO_ROUTE, get(logo))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Serving water level panel for {} on {}", station, addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
