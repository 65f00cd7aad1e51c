//! HTTP server lifecycle

use std::net::SocketAddr;
use std::time::Duration;

use axum::middleware;
use lti_grade_core::api::ServerConfig;
use tokio::signal;
use tracing::{info, warn};

use crate::http::{
    middleware::{create_timeout_layer, request_logger, timeout_body},
    routes::create_router,
    AppState,
};

/// Serves until Ctrl+C, SIGTERM, or a message on `state.shutdown_tx`.
pub async fn start_server(config: ServerConfig, state: AppState) -> Result<(), std::io::Error> {
    let app = create_router(state.clone())
        .layer(create_timeout_layer(Duration::from_secs(config.request_timeout_secs)))
        .layer(middleware::map_response(timeout_body))
        .layer(middleware::from_fn(request_logger));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("LTI grade service listening on http://{}", addr);

    let mut shutdown_rx = state.shutdown_tx.subscribe();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C signal");
                }
                _ = shutdown_rx.recv() => {
                    info!("Received shutdown signal");
                }
                _ = wait_for_sigterm() => {
                    info!("Received SIGTERM signal");
                }
            }
            info!("Starting graceful shutdown...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
