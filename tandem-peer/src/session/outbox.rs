use crate::signaling::SignalingOutput;
use std::collections::VecDeque;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Connecting,
    Open,
    Closed,
}

/// Outbound frames of one signaling channel.
///
/// Frames submitted while the channel is still connecting are held and
/// flushed, in order, the one time it opens. Frames submitted after it
/// closed are dropped.
#[derive(Debug, Default)]
pub struct Outbox {
    state: ChannelState,
    pending: VecDeque<String>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub async fn submit(&mut self, output: &dyn SignalingOutput, frame: String) {
        match self.state {
            ChannelState::Connecting => self.pending.push_back(frame),
            ChannelState::Open => {
                if let Err(e) = output.send(frame).await {
                    error!("Failed to send signaling frame: {:?}", e);
                }
            }
            ChannelState::Closed => debug!("Signaling closed, dropping outbound frame"),
        }
    }

    /// Marks the channel open and flushes the held frames. Only the first
    /// call after connecting does anything; returns the number flushed.
    pub async fn open(&mut self, output: &dyn SignalingOutput) -> usize {
        if self.state != ChannelState::Connecting {
            return 0;
        }
        self.state = ChannelState::Open;

        let mut flushed = 0;
        while let Some(frame) = self.pending.pop_front() {
            if let Err(e) = output.send(frame).await {
                error!("Failed to flush signaling frame: {:?}", e);
                continue;
            }
            flushed += 1;
        }
        if flushed > 0 {
            info!("Flushed {} deferred signaling frames", flushed);
        }
        flushed
    }

    pub fn close(&mut self) {
        self.state = ChannelState::Closed;
        if !self.pending.is_empty() {
            debug!("Dropping {} unsent signaling frames", self.pending.len());
            self.pending.clear();
        }
    }
}
