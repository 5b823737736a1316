//! Integration tests for tandem-relay.
//!
//! Each test runs the relay on an ephemeral port and talks to it with
//! tokio-tungstenite clients.


use std::net::SocketAddr;
use std::time::Duration;

use tandem_core::RoomId;
use tandem_relay::{RelayState, serve_listener};
use tokio::net::TcpListener;
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub async fn start_relay() -> (SocketAddr, RelayState) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    let state = RelayState::new();

    tokio::spawn(serve_listener(listener, state.clone()));
    (addr, state)
}

/// Waits until the relay has registered `size` members in `room`.
pub async fn wait_for_room_size(state: &RelayState, room: &str, size: usize) -> bool {
    let room = RoomId::from(room);
    for _ in 0..500 {
        if state.room_size(&room) == size {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
