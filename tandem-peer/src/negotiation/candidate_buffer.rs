use crate::transport::PeerConnection;
use std::collections::VecDeque;
use tandem_core::IceCandidate;
use tracing::{debug, warn};

/// Remote ICE candidates that arrived before a remote description existed.
#[derive(Debug, Default)]
pub struct CandidateBuffer {
    queue: VecDeque<IceCandidate>,
}

impl CandidateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, candidate: IceCandidate) {
        self.queue.push_back(candidate);
    }

    /// Applies every buffered candidate in arrival order, one at a time, and
    /// leaves the buffer empty. Returns how many were accepted by the peer.
    pub async fn drain(&mut self, peer: &dyn PeerConnection) -> usize {
        if self.queue.is_empty() {
            return 0;
        }

        debug!("Draining {} buffered ICE candidates", self.queue.len());
        let mut applied = 0;
        while let Some(candidate) = self.queue.pop_front() {
            match peer.add_ice_candidate(candidate).await {
                Ok(()) => applied += 1,
                Err(e) => warn!("Failed to apply buffered ICE candidate: {:?}", e),
            }
        }
        applied
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
