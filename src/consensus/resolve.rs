// Longest-valid-chain consensus

use crate::consensus::validation::{ChainValidator, ValidationError};
use crate::core::Block;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A chain as reported by a peer's `/chain` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ReportedChain {
    /// Wrap a chain, filling in its length
    pub fn new(chain: Vec<Block>) -> Self {
        Self {
            length: chain.len(),
            chain,
        }
    }
}

/// Why a peer's chain could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection failed or timed out
    Network(String),
    /// Peer answered with a non-success status
    Status(u16),
    /// Response body was not a chain
    Malformed(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "Network error: {}", e),
            FetchError::Status(code) => write!(f, "Unexpected status {}", code),
            FetchError::Malformed(e) => write!(f, "Malformed response: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

/// Source of peer chains (the HTTP client in production)
pub trait ChainSource {
    /// Fetch the chain currently held by `peer`
    fn fetch_chain(&self, peer: &str)
        -> impl Future<Output = Result<ReportedChain, FetchError>> + Send;
}

/// What happened with one peer during a resolution pass
#[derive(Debug, Clone, PartialEq)]
pub enum PeerOutcome {
    /// Valid and longer than anything seen before it
    Leading { length: usize },
    /// Not longer than the best chain at the time it was checked
    NotLonger { length: usize },
    /// Longer, but failed validation
    Invalid(ValidationError),
    /// Skipped: could not be fetched
    Unreachable(FetchError),
}

/// Per-peer record of a resolution pass
#[derive(Debug, Clone, PartialEq)]
pub struct PeerReport {
    pub peer: String,
    pub outcome: PeerOutcome,
}

/// Result of a resolution pass
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Whether a peer chain won over the local one
    pub replaced: bool,
    /// The winning chain (the local chain when not replaced)
    pub chain: Vec<Block>,
    /// Peer whose chain won, if any
    pub winner: Option<String>,
    /// One report per peer, in scan order
    pub reports: Vec<PeerReport>,
}

/// Consensus resolver - longest valid chain wins
///
/// Only raw length counts. A peer chain must be strictly longer than the
/// best seen so far, so ties keep whichever came first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusResolver {
    validator: ChainValidator,
}

impl ConsensusResolver {
    /// Create a new resolver
    pub fn new() -> Self {
        Self {
            validator: ChainValidator::new(),
        }
    }

    /// Scan every peer and pick the longest valid chain.
    ///
    /// The scan always covers all peers; a later peer may beat an earlier
    /// one. Unreachable peers are skipped. Nothing is mutated here: the
    /// caller decides whether to install `Resolution::chain`.
    pub async fn resolve<S>(&self, local: &[Block], peers: &[String], source: &S) -> Resolution
    where
        S: ChainSource + Sync,
    {
        let mut best: Option<(String, Vec<Block>)> = None;
        let mut best_length = local.len();
        let mut reports = Vec::with_capacity(peers.len());

        for peer in peers {
            let outcome = match source.fetch_chain(peer).await {
                Err(e) => {
                    log::warn!("Skipping peer {}: {}", peer, e);
                    PeerOutcome::Unreachable(e)
                }
                Ok(reported) if reported.length <= best_length => PeerOutcome::NotLonger {
                    length: reported.length,
                },
                Ok(reported) => match self.check(&reported) {
                    Err(e) => {
                        log::warn!("Rejecting chain from {}: {}", peer, e);
                        PeerOutcome::Invalid(e)
                    }
                    Ok(()) => {
                        best_length = reported.length;
                        best = Some((peer.clone(), reported.chain));
                        PeerOutcome::Leading { length: best_length }
                    }
                },
            };

            log::debug!("Peer {}: {:?}", peer, outcome);
            reports.push(PeerReport {
                peer: peer.clone(),
                outcome,
            });
        }

        match best {
            Some((peer, chain)) => {
                log::info!("Longest valid chain ({} blocks) is held by {}", chain.len(), peer);
                Resolution {
                    replaced: true,
                    chain,
                    winner: Some(peer),
                    reports,
                }
            }
            None => Resolution {
                replaced: false,
                chain: local.to_vec(),
                winner: None,
                reports,
            },
        }
    }

    fn check(&self, reported: &ReportedChain) -> Result<(), ValidationError> {
        if reported.length != reported.chain.len() {
            return Err(ValidationError::LengthMismatch {
                reported: reported.length,
                actual: reported.chain.len(),
            });
        }
        self.validator.validate_chain(&reported.chain)
    }
}

/// Canned chain source for tests
#[cfg(test)]
pub(crate) mod test_support {
    use super::{ChainSource, FetchError, ReportedChain};
    use std::collections::HashMap;

    /// Canned peer responses
    #[derive(Default)]
    pub struct FakeSource {
        responses: HashMap<String, Result<ReportedChain, FetchError>>,
    }

    impl FakeSource {
        pub fn with(mut self, peer: &str, response: Result<ReportedChain, FetchError>) -> Self {
            self.responses.insert(peer.to_string(), response);
            self
        }
    }

    impl ChainSource for FakeSource {
        async fn fetch_chain(&self, peer: &str) -> Result<ReportedChain, FetchError> {
            self.responses
                .get(peer)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Network("connection refused".to_string())))
        }
    }
}
