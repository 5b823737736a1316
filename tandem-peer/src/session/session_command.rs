use crate::media::MediaError;
use tandem_core::Mode;
use tokio::sync::oneshot;

/// User actions delivered to the session loop.
#[derive(Debug)]
pub enum SessionCommand {
    SwitchMode {
        mode: Mode,
        reply: oneshot::Sender<Result<(), MediaError>>,
    },
    ToggleMute {
        reply: oneshot::Sender<Option<bool>>,
    },
    SendChat {
        message: String,
    },
    SendImage {
        name: String,
        data: String,
    },
    SendFile {
        name: String,
        size: u64,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}
