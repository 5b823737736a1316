use tandem_core::{IceCandidate, MediaKind};
use tokio::sync::broadcast;
use webrtc::rtp::packet::Packet;

const REMOTE_PACKET_BACKLOG: usize = 256;

/// Events the peer connection produces for the session loop.
#[derive(Debug)]
pub enum PeerEvent {
    /// The transport wants a new offer/answer round.
    NegotiationNeeded,

    /// Local ICE agent surfaced a candidate that must reach the other side.
    LocalCandidate(IceCandidate),

    RemoteTrack(RemoteTrack),

    RemoteTrackEnded { kind: MediaKind, track_id: String },

    StateChanged(TransportState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Inbound track. RTP packets are republished to every subscriber.
#[derive(Debug, Clone)]
pub struct RemoteTrack {
    pub id: String,
    pub kind: MediaKind,
    pub stream_id: String,
    packets: broadcast::Sender<Packet>,
}

impl RemoteTrack {
    pub fn new(id: impl Into<String>, kind: MediaKind, stream_id: impl Into<String>) -> Self {
        let (packets, _) = broadcast::channel(REMOTE_PACKET_BACKLOG);
        Self {
            id: id.into(),
            kind,
            stream_id: stream_id.into(),
            packets,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Packet> {
        self.packets.subscribe()
    }

    pub(crate) fn publish(&self, packet: Packet) {
        // Err only means nobody is subscribed.
        let _ = self.packets.send(packet);
    }
}
