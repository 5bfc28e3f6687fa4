//! Engagement Demo API Server

mod app;
mod error;
mod routes;
mod visitor;

use demo_core::engagement::{InMemoryEngagement, DEFAULT_MAX_VISITORS};
use demo_core::{CoreResult, TariffCatalog, VisitorClients};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers
pub struct AppState {
    pub catalog: TariffCatalog,
    pub engagement: VisitorClients<InMemoryEngagement>,
}

impl AppState {
    pub fn new(catalog: TariffCatalog, max_visitors: usize) -> Self {
        Self {
            catalog,
            engagement: VisitorClients::new(max_visitors),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub catalog_path: Option<PathBuf>,
    pub max_visitors: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: std::env::var("DEMO_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            catalog_path: std::env::var_os("TARIFF_CATALOG_PATH").map(PathBuf::from),
            max_visitors: std::env::var("ENGAGEMENT_MAX_VISITORS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_VISITORS),
        }
    }
}

impl ApiConfig {
    /// Catalog from `catalog_path`, or the built-in tariffs
    pub fn load_catalog(&self) -> CoreResult<TariffCatalog> {
        match &self.catalog_path {
            Some(path) => TariffCatalog::from_file(path),
            None => Ok(TariffCatalog::default()),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "demo_api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Engagement Demo API Server");

    let config = ApiConfig::default();

    let catalog = match config.load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load tariff catalog: {}", e);
            std::process::exit(1);
        }
    };

    info!("Serving {} tariffs", catalog.len());

    let state = Arc::new(AppState::new(catalog, config.max_visitors));
    let addr = config.bind_addr;
    let app = app::build_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
