// Hashing utilities for blocks
//
// A block is hashed over its canonical form: compact JSON with keys in
// lexicographic order at every level. The borrowed views below declare
// their fields in that order, so the bytes never depend on how `Block`
// itself is laid out.

use crate::core::{Block, Transaction};
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Serialize)]
struct CanonicalBlock<'a> {
    index: u64,
    previous_hash: &'a str,
    proof: u64,
    timestamp: f64,
    transactions: Vec<CanonicalTransaction<'a>>,
}

#[derive(Serialize)]
struct CanonicalTransaction<'a> {
    amount: u64,
    recipient: &'a str,
    sender: &'a str,
}

impl<'a> From<&'a Transaction> for CanonicalTransaction<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            amount: tx.amount,
            recipient: &tx.recipient,
            sender: &tx.sender,
        }
    }
}

/// Canonical byte encoding of a block
///
/// Compact separators (`,` and `:`), so the digest differs from one taken
/// over Python's `json.dumps(sort_keys=True)` output. Nodes only agree on
/// hashes with peers that use this same encoding.
pub fn canonical_bytes(block: &Block) -> Vec<u8> {
    let canonical = CanonicalBlock {
        index: block.index,
        previous_hash: &block.previous_hash,
        proof: block.proof,
        timestamp: block.timestamp,
        transactions: block.transactions.iter().map(CanonicalTransaction::from).collect(),
    };
    serde_json::to_vec(&canonical).expect("canonical block has only string keys")
}

/// SHA-256 digest of a block, hex encoded
pub fn digest(block: &Block) -> String {
    sha256_hex(&canonical_bytes(block))
}

/// Single SHA256 hash, hex encoded
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
