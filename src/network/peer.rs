// Peer address bookkeeping

use std::collections::BTreeSet;

/// Reduce a peer URL to its `host[:port]` authority.
///
/// Accepts both `http://host:port/...` and bare `host:port`.
pub fn normalize_address(address: &str) -> Result<String, String> {
    let trimmed = address.trim();
    let without_scheme = match trimmed.split_once("://") {
        Some((_, rest)) => rest,
        None => trimmed,
    };

    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    if authority.is_empty() || authority.chars().any(char::is_whitespace) {
        return Err(format!("Invalid URL: {}", address));
    }

    Ok(authority.to_ascii_lowercase())
}

/// Set of known peers, keyed by normalized authority
#[derive(Debug, Clone, Default)]
pub struct PeerSet {
    peers: BTreeSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer; returns its normalized address
    pub fn register(&mut self, address: &str) -> Result<String, String> {
        let peer = normalize_address(address)?;
        if self.peers.insert(peer.clone()) {
            log::info!("Registered peer {}", peer);
        }
        Ok(peer)
    }

    /// Register several peers. Nothing is added if any address is invalid.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<(), String> {
        let normalized = addresses
            .iter()
            .map(|a| normalize_address(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        for peer in normalized {
            self.register(&peer)?;
        }
        Ok(())
    }

    /// Known peers in sorted order
    pub fn addresses(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("http://192.168.0.5:5000").unwrap(), "192.168.0.5:5000");
        assert_eq!(normalize_address("192.168.0.5:5000").unwrap(), "192.168.0.5:5000");
        assert_eq!(normalize_address("https://Node-A:5001/chain?x=1").unwrap(), "node-a:5001");
        assert_eq!(normalize_address("  localhost:5002/ ").unwrap(), "localhost:5002");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_address("").is_err());
        assert!(normalize_address("http://").is_err());
        assert!(normalize_address("/chain").is_err());
        assert!(normalize_address("bad host:5000").is_err());
    }

    #[test]
    fn test_register_deduplicates() {
        let mut peers = PeerSet::new();
        peers.register("http://localhost:5001").unwrap();
        peers.register("localhost:5001").unwrap();
        peers.register("localhost:5001/").unwrap();

        assert_eq!(peers.len(), 1);
        assert_eq!(peers.addresses(), vec!["localhost:5001".to_string()]);
    }

    #[test]
    fn test_register_all_is_atomic() {
        let mut peers = PeerSet::new();
        assert!(peers.register_all(&["localhost:5001", "http://"]).is_err());
        assert!(peers.is_empty());

        peers.register_all(&["b:1", "a:1"]).unwrap();
        assert_eq!(peers.addresses(), vec!["a:1".to_string(), "b:1".to_string()]);
    }
}
