mod media;
mod role;
mod room;
mod signaling;

pub use media::{MediaKind, Mode};
pub use role::{Participant, Role};
pub use room::{Membership, RoomId};
pub use signaling::{IceCandidate, IceServerConfig, SdpKind, SessionDescription};
