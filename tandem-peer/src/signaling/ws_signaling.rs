use crate::signaling::signaling_output::{SignalingEvent, SignalingOutput};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tandem_core::RoomId;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

enum Outgoing {
    Frame(String),
    Close,
}

/// WebSocket client for one relay room.
///
/// The socket lives in a background task. Frames submitted before the
/// connection is up wait in the task's queue.
pub struct WsSignaling {
    tx: mpsc::UnboundedSender<Outgoing>,
}

impl WsSignaling {
    pub fn spawn(url: String, events: mpsc::Sender<SignalingEvent>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_socket(url, rx, events));
        Self { tx }
    }
}

#[async_trait]
impl SignalingOutput for WsSignaling {
    async fn send(&self, frame: String) -> Result<()> {
        self.tx
            .send(Outgoing::Frame(frame))
            .map_err(|_| anyhow!("signaling channel is closed"))
    }

    async fn close(&self) {
        let _ = self.tx.send(Outgoing::Close);
    }
}

/// `{relay}/ws/{room}`, the route the relay serves rooms on. The room is
/// percent-encoded so it always stays a single path segment.
pub fn signaling_url(relay_url: &str, room: &RoomId) -> String {
    format!(
        "{}/ws/{}",
        relay_url.trim_end_matches('/'),
        urlencoding::encode(room.as_str())
    )
}

async fn run_socket(
    url: String,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
    events: mpsc::Sender<SignalingEvent>,
) {
    let socket = match connect_async(url.as_str()).await {
        Ok((socket, _)) => socket,
        Err(e) => {
            error!("Failed to connect to signaling relay {}: {}", url, e);
            let _ = events.send(SignalingEvent::Closed).await;
            return;
        }
    };

    info!("Signaling connected: {}", url);
    if events.send(SignalingEvent::Open).await.is_err() {
        return;
    }

    let (mut write, mut read) = socket.split();

    loop {
        tokio::select! {
            out = outgoing.recv() => match out {
                Some(Outgoing::Frame(text)) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        error!("Failed to write signaling frame: {}", e);
                        break;
                    }
                }
                Some(Outgoing::Close) | None => {
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
            },

            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let frame = SignalingEvent::Frame(text.as_str().to_owned());
                    if events.send(frame).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Signaling socket error: {}", e);
                    break;
                }
            },
        }
    }

    debug!("Signaling socket task finished: {}", url);
    let _ = events.send(SignalingEvent::Closed).await;
}
