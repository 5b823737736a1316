use crate::transport::RemoteTrack;
use tandem_core::MediaKind;

/// The remote participant's tracks, at most one per kind.
#[derive(Debug, Clone, Default)]
pub struct RemoteMedia {
    audio: Option<RemoteTrack>,
    video: Option<RemoteTrack>,
}

impl RemoteMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever track of the same kind was there.
    pub fn insert(&mut self, track: RemoteTrack) {
        let kind = track.kind;
        *self.slot(kind) = Some(track);
    }

    /// Removes the track only if it is still the current one for its kind.
    pub fn remove(&mut self, kind: MediaKind, track_id: &str) -> bool {
        let slot = self.slot(kind);
        if slot.as_ref().is_some_and(|t| t.id == track_id) {
            *slot = None;
            return true;
        }
        false
    }

    pub fn get(&self, kind: MediaKind) -> Option<&RemoteTrack> {
        match kind {
            MediaKind::Audio => self.audio.as_ref(),
            MediaKind::Video => self.video.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.video.is_none()
    }

    fn slot(&mut self, kind: MediaKind) -> &mut Option<RemoteTrack> {
        match kind {
            MediaKind::Audio => &mut self.audio,
            MediaKind::Video => &mut self.video,
        }
    }
}
