use anyhow::Result;
use async_trait::async_trait;

/// What the signaling channel reports back to the session, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingEvent {
    /// Raised once, when the channel becomes writable.
    Open,
    Frame(String),
    /// The channel is gone. No reconnect follows.
    Closed,
}

#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send(&self, frame: String) -> Result<()>;

    async fn close(&self);
}
