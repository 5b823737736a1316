pub mod mock_peer;

pub use mock_devices::*;
pub use mock_peer::*;
pub use mock_signaling::*;
