//! routemeter demo gateway.
//!
//! Loads `ROUTEMETER_CONFIG` (default `routemeter.yaml`), binds the order
//! resource with timing/rate metrics, and serves it with `/healthz` and
//! `/metrics`.

use tracing_subscriber::{fmt, EnvFilter};

use routemeter_core::error::{Result, RouteMeterError};
use routemeter_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("ROUTEMETER_CONFIG").unwrap_or_else(|_| "routemeter.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state)?;

    tracing::info!(%listen, "routemeter-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| RouteMeterError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| RouteMeterError::Internal(format!("server failed: {e}")))
}
