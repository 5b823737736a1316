use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Time a client waits for a frame before giving up.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Time a client listens to confirm nothing arrives.
pub const SILENCE: Duration = Duration::from_millis(200);

/// A room member talking to the relay over a real WebSocket.
pub struct TestClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr, room: &str) -> Result<Self> {
        let url = format!("ws://{}/ws/{}", addr, room);
        let (socket, _) = connect_async(url.as_str())
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        Ok(Self { socket })
    }

    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.socket
            .send(Message::Text(text.into()))
            .await
            .context("Failed to send frame")
    }

    /// Next text frame, skipping control frames.
    pub async fn recv_text(&mut self) -> Result<String> {
        tokio::time::timeout(RECV_TIMEOUT, self.next_text())
            .await
            .context("Timeout waiting for frame")?
    }

    /// True when no text frame arrives within `SILENCE`.
    pub async fn is_silent(&mut self) -> bool {
        tokio::time::timeout(SILENCE, self.recv_text()).await.is_err()
    }

    async fn next_text(&mut self) -> Result<String> {
        while let Some(msg) = self.socket.next().await {
            if let Message::Text(text) = msg? {
                return Ok(text.as_str().to_owned());
            }
        }
        anyhow::bail!("Socket closed")
    }

    pub async fn close(mut self) -> Result<()> {
        self.socket.close(None).await.context("Failed to close socket")
    }
}
