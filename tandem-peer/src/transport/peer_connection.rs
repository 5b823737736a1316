use crate::media::LocalTrack;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{IceCandidate, MediaKind, SessionDescription};

/// The slice of a peer connection the session drives.
///
/// Implementations declare one audio and one video transceiver when they are
/// created and hand out the same sender for a kind for their whole lifetime.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    fn sender(&self, kind: MediaKind) -> Arc<dyn MediaSender>;

    async fn close(&self) -> Result<()>;
}

/// Outbound half of a transceiver. Swapping its track never renegotiates.
#[async_trait]
pub trait MediaSender: Send + Sync {
    fn kind(&self) -> MediaKind;

    /// `None` leaves the transceiver negotiated but sends nothing.
    async fn replace_track(&self, track: Option<LocalTrack>) -> Result<()>;
}
