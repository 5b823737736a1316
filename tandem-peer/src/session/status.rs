use crate::session::outbox::ChannelState;
use crate::transport::TransportState;

/// Connectivity as seen by the session: the relay channel and the peer transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStatus {
    pub signaling: ChannelState,
    pub transport: TransportState,
}

impl SessionStatus {
    pub fn is_connected(&self) -> bool {
        self.transport == TransportState::Connected
    }
}
