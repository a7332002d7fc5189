use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::grant::processor::GrantProcessor;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::routes::{handle_not_found, handle_token, handle_validate};
use crate::utils::constants::{TOKEN_PATH, VALIDATE_PATH};

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub processor: GrantProcessor,
}

impl AppState {
    pub fn new(metrics: &Metrics, processor: GrantProcessor) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            processor,
        }
    }
}

/// Token, validation and (optional) metrics routes. Unknown paths and methods
/// get a JSON 404.
pub fn router(state: AppState, settings_config: &SettingsConfig) -> Router {
    Router::new()
        .route(TOKEN_PATH, post(handle_token).fallback(handle_not_found))
        .route(VALIDATE_PATH, get(handle_validate).fallback(handle_not_found))
        .merge(state.metrics_state.router(&settings_config.metrics))
        .fallback(handle_not_found)
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn start(settings_config: &SettingsConfig, processor: GrantProcessor) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, processor);
    let app = router(state, settings_config);

    let bind_addr = settings_config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("token endpoint: http://{}{}", bind_addr, TOKEN_PATH);
    info!("validation endpoint: http://{}{}", bind_addr, VALIDATE_PATH);

    metrics.up.set(1);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed");
    metrics.up.set(0);
    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            // without a signal handler keep serving
            error!("failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}
