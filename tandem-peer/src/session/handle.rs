use crate::media::{Capture, ModeState};
use crate::negotiation::NegotiationStatus;
use crate::session::chat_log::ChatLog;
use crate::session::error::SessionError;
use crate::session::remote_media::RemoteMedia;
use crate::session::session_command::SessionCommand;
use crate::session::status::SessionStatus;
use tandem_core::{Membership, Mode};
use tokio::sync::{mpsc, oneshot, watch};

/// Cloneable control surface of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    pub(crate) membership: Membership,
    pub(crate) commands: mpsc::Sender<SessionCommand>,
    pub(crate) status: watch::Receiver<SessionStatus>,
    pub(crate) mode: watch::Receiver<ModeState>,
    pub(crate) chat: watch::Receiver<ChatLog>,
    pub(crate) remote_media: watch::Receiver<RemoteMedia>,
    pub(crate) preview: watch::Receiver<Option<Capture>>,
    pub(crate) negotiation: watch::Receiver<NegotiationStatus>,
}

impl SessionHandle {
    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    /// Resolves once the media work for `mode` finished. On error the
    /// committed mode is unchanged.
    pub async fn switch_mode(&self, mode: Mode) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::SwitchMode { mode, reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)?.map_err(SessionError::from)
    }

    /// New mute flag, or `None` when there is no audio to mute.
    pub async fn toggle_mute(&self) -> Result<Option<bool>, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::ToggleMute { reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn send_chat(&self, message: impl Into<String>) -> Result<(), SessionError> {
        self.send(SessionCommand::SendChat {
            message: message.into(),
        })
        .await
    }

    pub async fn send_image(
        &self,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.send(SessionCommand::SendImage {
            name: name.into(),
            data: data.into(),
        })
        .await
    }

    pub async fn send_file(&self, name: impl Into<String>, size: u64) -> Result<(), SessionError> {
        self.send(SessionCommand::SendFile {
            name: name.into(),
            size,
        })
        .await
    }

    /// Tears the session down and waits for it. A no-op if it already ended.
    pub async fn shutdown(&self) {
        let (reply, rx) = oneshot::channel();
        if self.send(SessionCommand::Shutdown { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    pub fn status(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    pub fn mode(&self) -> watch::Receiver<ModeState> {
        self.mode.clone()
    }

    pub fn chat(&self) -> watch::Receiver<ChatLog> {
        self.chat.clone()
    }

    pub fn remote_media(&self) -> watch::Receiver<RemoteMedia> {
        self.remote_media.clone()
    }

    pub fn preview(&self) -> watch::Receiver<Option<Capture>> {
        self.preview.clone()
    }

    pub fn negotiation(&self) -> watch::Receiver<NegotiationStatus> {
        self.negotiation.clone()
    }

    async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}
