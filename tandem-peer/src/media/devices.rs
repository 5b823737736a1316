use crate::media::track::{Capture, LocalTrack};
use async_trait::async_trait;
use tandem_core::MediaKind;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("camera/microphone permission denied")]
    PermissionDenied,

    #[error("capture device unavailable: {0}")]
    Unavailable(String),

    #[error("failed to attach {kind} track to its sender: {reason}")]
    Sender { kind: MediaKind, reason: String },
}

/// Source of camera+microphone captures.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Acquires a fresh capture. Every call yields new tracks.
    async fn acquire(&self) -> Result<Capture, MediaError>;
}

/// Opus + VP8 sample tracks fed by the host application.
///
/// The host receives each capture through the session's preview channel and
/// writes encoded frames into its tracks.
#[derive(Debug, Clone, Default)]
pub struct SampleDevices;

impl SampleDevices {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaDevices for SampleDevices {
    async fn acquire(&self) -> Result<Capture, MediaError> {
        let stream_id = format!("tandem-{}", Uuid::new_v4().simple());
        let capture = Capture::new(
            LocalTrack::new(MediaKind::Audio, Uuid::new_v4().to_string(), stream_id.clone()),
            LocalTrack::new(MediaKind::Video, Uuid::new_v4().to_string(), stream_id.clone()),
        );
        info!("Acquired local capture {}", stream_id);
        Ok(capture)
    }
}
