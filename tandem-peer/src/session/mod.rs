mod chat_log;
mod error;
mod handle;
mod outbox;
mod remote_media;
mod session;
mod session_command;
mod status;

pub use chat_log::*;
pub use error::*;
pub use handle::*;
pub use outbox::*;
pub use remote_media::*;
pub use session::*;
pub use session_command::*;
pub use status::*;
