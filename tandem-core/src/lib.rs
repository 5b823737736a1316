pub mod envelope;
pub mod model;

pub use envelope::{CodecError, Envelope, decode, encode};
pub use model::*;
