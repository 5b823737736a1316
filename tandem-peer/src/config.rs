use tandem_core::IceServerConfig;

const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
const DEFAULT_RELAY_URL: &str = "ws://127.0.0.1:8000";

/// ICE configuration for the peer connection.
#[derive(Debug, Clone)]
pub struct PeerConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec![DEFAULT_STUN_ADDR.to_owned()],
                username: None,
                credential: None,
            }],
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the relay, e.g. `ws://host:8000`. The room path is appended.
    pub relay_url: String,
    pub peer: PeerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_owned(),
            peer: PeerConfig::default(),
        }
    }
}
