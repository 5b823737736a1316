mod config;
mod room;
mod signaling;

pub use config::*;
pub use room::*;
pub use signaling::*;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

/// `/ws/{room_id}`: one WebSocket per room member.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/ws/{room_id}", get(ws_handler))
        .with_state(state)
}

pub async fn serve(config: RelayConfig) -> Result<()> {
    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind relay to {}", config.addr))?;
    serve_listener(listener, RelayState::new()).await
}

/// Runs the relay on an already bound listener until the server fails.
pub async fn serve_listener(listener: TcpListener, state: RelayState) -> Result<()> {
    info!("Relay listening on ws://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .await
        .context("Relay server stopped")
}
