use crate::media::devices::{MediaDevices, MediaError};
use crate::media::mode_state::ModeState;
use crate::media::track::Capture;
use crate::transport::{MediaSender, PeerConnection};
use std::sync::Arc;
use tandem_core::{MediaKind, Mode};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Produces or retracts local media by swapping track content on the two
/// pre-declared senders. Never touches negotiation.
pub struct MediaController {
    devices: Arc<dyn MediaDevices>,
    audio: Arc<dyn MediaSender>,
    video: Arc<dyn MediaSender>,
    capture: Option<Capture>,
    muted: bool,
    state: ModeState,
    mode_tx: watch::Sender<ModeState>,
    preview_tx: watch::Sender<Option<Capture>>,
}

impl MediaController {
    /// Takes the peer's senders once; they are reused for every later switch.
    pub fn new(devices: Arc<dyn MediaDevices>, peer: &dyn PeerConnection) -> Self {
        let (mode_tx, _) = watch::channel(ModeState::default());
        let (preview_tx, _) = watch::channel(None);

        Self {
            devices,
            audio: peer.sender(MediaKind::Audio),
            video: peer.sender(MediaKind::Video),
            capture: None,
            muted: false,
            state: ModeState::default(),
            mode_tx,
            preview_tx,
        }
    }

    pub fn mode_state(&self) -> ModeState {
        self.state
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn capture(&self) -> Option<&Capture> {
        self.capture.as_ref()
    }

    pub fn audio_sender(&self) -> Arc<dyn MediaSender> {
        self.audio.clone()
    }

    pub fn video_sender(&self) -> Arc<dyn MediaSender> {
        self.video.clone()
    }

    pub fn subscribe_mode(&self) -> watch::Receiver<ModeState> {
        self.mode_tx.subscribe()
    }

    /// Local preview surface: the capture currently being sent, if any.
    pub fn subscribe_preview(&self) -> watch::Receiver<Option<Capture>> {
        self.preview_tx.subscribe()
    }

    /// Runs the media work for `mode` and commits it only on success.
    pub async fn switch_mode(&mut self, mode: Mode) -> Result<(), MediaError> {
        let from = self.state.mode();
        self.set_state(ModeState::Switching { from, to: mode });

        let result = if mode.wants_media() {
            self.enter_video_mode().await
        } else {
            self.enter_chat_mode().await;
            Ok(())
        };

        match &result {
            Ok(()) => {
                info!("Mode switched {:?} -> {:?}", from, mode);
                self.set_state(ModeState::Active(mode));
            }
            Err(e) => {
                warn!("Mode switch {:?} -> {:?} failed: {}", from, mode, e);
                self.set_state(ModeState::Failed {
                    mode: from,
                    attempted: mode,
                });
            }
        }
        result
    }

    /// Acquires a fresh capture and puts its tracks on the existing senders.
    /// A no-op while a capture is already being sent.
    pub async fn enter_video_mode(&mut self) -> Result<(), MediaError> {
        if self.capture.is_some() {
            debug!("Video already active, keeping current capture");
            return Ok(());
        }

        let capture = self.devices.acquire().await?;
        self.preview_tx.send_replace(Some(capture.clone()));

        for sender in [&self.audio, &self.video] {
            let kind = sender.kind();
            if let Err(e) = sender
                .replace_track(Some(capture.track(kind).clone()))
                .await
            {
                capture.stop();
                self.retract_senders().await;
                self.preview_tx.send_replace(None);
                return Err(MediaError::Sender {
                    kind,
                    reason: e.to_string(),
                });
            }
        }

        self.muted = false;
        capture.audio().set_enabled(true);
        self.capture = Some(capture);
        Ok(())
    }

    /// Empties both senders and releases the capture hardware. Sender errors
    /// are logged; the capture is stopped regardless.
    pub async fn enter_chat_mode(&mut self) {
        self.retract_senders().await;
        self.release();
    }

    /// Flips the mute flag. `None` when there is no audio track to mute.
    pub fn toggle_mute(&mut self) -> Option<bool> {
        let capture = self.capture.as_ref()?;
        self.muted = !self.muted;
        capture.audio().set_enabled(!self.muted);
        debug!("Microphone muted: {}", self.muted);
        Some(self.muted)
    }

    /// Stops the held capture, if any, and clears the preview.
    pub fn release(&mut self) {
        if let Some(capture) = self.capture.take() {
            capture.stop();
            info!("Released local capture");
        }
        self.preview_tx.send_replace(None);
    }

    async fn retract_senders(&self) {
        for sender in [&self.audio, &self.video] {
            if let Err(e) = sender.replace_track(None).await {
                warn!("Failed to empty {} sender: {:?}", sender.kind(), e);
            }
        }
    }

    fn set_state(&mut self, state: ModeState) {
        self.state = state;
        self.mode_tx.send_replace(state);
    }
}
