pub use tandem_core::{Envelope, Membership, Mode, Role, RoomId};

pub mod model {
    pub use tandem_core::model::*;
    pub use tandem_core::{CodecError, Envelope, decode, encode};
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use tandem_peer::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use tandem_relay::*;
}
