// Block data structures

use crate::core::{digest, Transaction};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Proof seeded into the genesis block
pub const GENESIS_PROOF: u64 = 100;

/// previous_hash sentinel of the genesis block (it has no predecessor)
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Block - an entry in the chain
///
/// Field order here is the wire order used by `/chain`. Hashing does not
/// depend on it, see [`crate::core::hash`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, 1-based
    pub index: u64,
    /// Creation time (Unix epoch, seconds)
    pub timestamp: f64,
    /// Transactions in submission order
    pub transactions: Vec<Transaction>,
    /// Proof-of-work solution relative to the previous block's proof
    pub proof: u64,
    /// Hex digest of the previous block, or the genesis sentinel
    pub previous_hash: String,
}

impl Block {
    /// Create a new block stamped with the current time
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: impl Into<String>,
    ) -> Self {
        Self {
            index,
            timestamp: now(),
            transactions,
            proof,
            previous_hash: previous_hash.into(),
        }
    }

    /// Create a genesis block with the given seed proof and sentinel
    pub fn genesis(proof: u64, previous_hash: impl Into<String>) -> Self {
        Self::new(1, Vec::new(), proof, previous_hash)
    }

    /// Get the block hash
    pub fn hash(&self) -> String {
        digest(self)
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.index == 1
    }
}

/// Current Unix time in seconds with sub-second precision
fn now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
