use std::net::SocketAddr;

const DEFAULT_RELAY_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub addr: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_RELAY_PORT)),
        }
    }
}
