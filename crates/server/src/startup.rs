use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::runtime::{self, Backend};
use service::storage::uuid_generator;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Command-line argument wins; otherwise the configured backend.
pub fn resolve_backend(arg: Option<&str>, cfg: &AppConfig) -> Backend {
    Backend::from_arg(arg.unwrap_or(&cfg.storage.backend))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {}", e)))
}

/// Open the selected repository and wire the router around it.
pub async fn build_app(cfg: &AppConfig, backend: Backend) -> Result<Router, StartupError> {
    // The CSV file is created here if missing.
    let payments = runtime::build_service(backend, &cfg.storage.csv_path, uuid_generator()).await?;
    Ok(routes::build_router(AppState { payments }, build_cors()))
}

async fn shutdown_signal() {
    // Without a signal handler, never resolve.
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig, backend: Backend) -> anyhow::Result<()> {
    let app = build_app(&cfg, backend).await?;

    // Bind
    let addr = bind_addr(&cfg)?;
    info!(%addr, %backend, csv_path = %cfg.storage.csv_path, "starting payments server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(StartupError::from)?;
    // In-flight requests finish before shutdown completes.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_overrides_config_backend() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = "CSV".into();
        assert_eq!(resolve_backend(None, &cfg), Backend::Csv);
        assert_eq!(resolve_backend(Some("MEM"), &cfg), Backend::Memory);
        assert_eq!(resolve_backend(Some("anything"), &cfg), Backend::Memory);

        cfg.storage.backend = "MEM".into();
        assert_eq!(resolve_backend(Some("CSV"), &cfg), Backend::Csv);
    }

    #[test]
    fn bad_host_is_invalid_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn default_binds_port_8080() {
        let addr = bind_addr(&AppConfig::default()).unwrap();
        assert_eq!(addr.port(), 8080);
    }
}
