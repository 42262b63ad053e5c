// Node configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Default HTTP port of a node
pub const DEFAULT_PORT: u16 = 5000;

/// Default per-request timeout when fetching peer chains
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings needed to start a node
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address the HTTP API listens on
    pub listen_addr: SocketAddr,
    /// Peers registered at startup
    pub peers: Vec<String>,
    /// Recipient of mining rewards; random when not set
    pub node_id: Option<String>,
    /// Timeout for each peer `/chain` request
    pub peer_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            peers: Vec::new(),
            node_id: None,
            peer_timeout: DEFAULT_PEER_TIMEOUT,
        }
    }
}

/// Random 32 hex character node identifier
pub fn random_node_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert_eq!(config.listen_addr.port(), 5000);
        assert!(config.peers.is_empty());
        assert_eq!(config.peer_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_random_node_id() {
        let id = random_node_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, random_node_id());
    }
}
