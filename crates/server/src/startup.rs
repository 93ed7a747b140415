use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, UploadConfig};
use dotenvy::dotenv;
use service::runtime::{self, Services};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub uploads: UploadConfig,
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router with every route and layer, without binding a socket.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Public entry: load config, wire storage, run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    if cfg.uses_dev_secret() {
        warn!("JWT_SECRET not set; using the development secret");
    }

    runtime::ensure_env(&cfg.uploads.root, &cfg.storage.data_dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let services = Services::from_config(&cfg).await?;
    let app = build_app(AppState { services, uploads: cfg.uploads.clone() });

    let addr = bind_addr(&cfg)?;
    info!(%addr, backend = ?cfg.storage.backend, "starting marketplace server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
