//! axum front end over the scoring core

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

use tracing::{error, info};

use crate::config::ServerConfig;

/// Binds the configured address and serves until Ctrl+C
///
/// # Errors
///
/// Returns an error if the address cannot be bound
pub async fn serve(server: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let address = server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server listening on http://{address}");

    axum::serve(listener, create_router(state, server))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
