//! HTTP server lifecycle: bind, serve `api_router()`, stop on Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::api::router::api_router;
use crate::core_state::CoreState;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Serve the API until Ctrl-C.
pub async fn serve(core: Arc<CoreState>, addr: SocketAddr) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "API server listening");

    axum::serve(listener, api_router(core))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
}
