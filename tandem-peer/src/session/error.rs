use crate::media::MediaError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is no longer running")]
    Closed,

    #[error(transparent)]
    Media(#[from] MediaError),
}
