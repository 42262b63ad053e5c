// Proof of Work implementation
//
// A proof `p` is valid relative to the previous block's proof `q` when
// SHA256 of the decimal text "{q}{p}" has a hex digest starting with
// the target prefix. Checking costs one hash; finding one takes about
// 16^4 attempts at the fixed difficulty.

use crate::core::sha256_hex;
use std::time::{Duration, Instant};

/// Difficulty target: required hex prefix of the proof digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    prefix: &'static str,
}

impl Target {
    /// The fixed network difficulty
    pub const STANDARD: Target = Target { prefix: "0000" };

    /// Check if a hex digest meets this target
    pub fn is_valid_digest(&self, digest: &str) -> bool {
        digest.starts_with(self.prefix)
    }

    /// Number of leading zero hex digits required
    pub fn leading_zeros(&self) -> usize {
        self.prefix.len()
    }
}

/// Digest of a candidate proof against the previous proof
pub fn proof_digest(last_proof: u64, proof: u64) -> String {
    sha256_hex(format!("{}{}", last_proof, proof).as_bytes())
}

/// Proof of Work miner
#[derive(Debug, Clone, Copy)]
pub struct Miner {
    /// Fixed difficulty target
    pub target: Target,
}

impl Default for Miner {
    fn default() -> Self {
        Self::new()
    }
}

impl Miner {
    /// Create a new miner at the fixed difficulty
    pub fn new() -> Self {
        Self {
            target: Target::STANDARD,
        }
    }

    /// Search proofs upward from 0 until one validates.
    ///
    /// Blocks the calling thread; there is no bound and no cancellation.
    pub fn mine(&self, last_proof: u64) -> MiningResult {
        let start_time = Instant::now();
        let mut attempts = 0u64;
        let mut proof = 0u64;

        loop {
            let digest = proof_digest(last_proof, proof);
            attempts += 1;

            if self.target.is_valid_digest(&digest) {
                return MiningResult {
                    proof,
                    digest,
                    attempts,
                    duration: start_time.elapsed(),
                };
            }

            // Progress indicator every 100k attempts
            if attempts % 100_000 == 0 {
                let elapsed = start_time.elapsed();
                log::debug!("Mining attempts: {} ({:.1} KH/s)",
                    attempts,
                    attempts as f64 / elapsed.as_secs_f64() / 1000.0
                );
            }

            proof += 1;
        }
    }

    /// Smallest proof that validates against `last_proof`
    pub fn solve(&self, last_proof: u64) -> u64 {
        self.mine(last_proof).proof
    }

    /// Verify that `proof` solves the puzzle posed by `last_proof`
    pub fn verify(&self, last_proof: u64, proof: u64) -> bool {
        self.target.is_valid_digest(&proof_digest(last_proof, proof))
    }
}

/// Mining result
#[derive(Debug, Clone)]
pub struct MiningResult {
    /// The proof that was found
    pub proof: u64,
    /// Digest of the winning candidate
    pub digest: String,
    /// Number of attempts
    pub attempts: u64,
    /// Time taken
    pub duration: Duration,
}

impl MiningResult {
    /// Calculate hash rate (hashes per second)
    pub fn hash_rate(&self) -> f64 {
        self.attempts as f64 / self.duration.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_validation() {
        let target = Target::STANDARD;
        assert_eq!(target.leading_zeros(), 4);

        assert!(target.is_valid_digest("0000abcdef"));
        assert!(!target.is_valid_digest("000fabcdef"));
        assert!(!target.is_valid_digest("ffff0000"));
    }

    #[test]
    fn test_proof_digest_uses_decimal_concatenation() {
        assert_eq!(proof_digest(100, 0), sha256_hex(b"1000"));
        assert_eq!(proof_digest(1, 23), proof_digest(12, 3));
    }

    #[test]
    fn test_trivial_proof_rejected() {
        let miner = Miner::new();
        assert!(!miner.verify(100, 0));
    }

    #[test]
    fn test_solve_is_valid_and_minimal() {
        let miner = Miner::new();
        let result = miner.mine(100);

        assert!(miner.verify(100, result.proof));
        assert!(Target::STANDARD.is_valid_digest(&result.digest));
        assert_eq!(result.attempts, result.proof + 1);

        // Linear search: nothing below the answer validates
        for candidate in 0..result.proof {
            assert!(!miner.verify(100, candidate), "{} should not validate", candidate);
        }
    }

    #[test]
    fn test_solve_deterministic() {
        let miner = Miner::new();
        assert_eq!(miner.solve(100), miner.solve(100));
    }

    #[test]
    fn test_verify_is_bound_to_last_proof() {
        let miner = Miner::new();
        let proof = miner.solve(7);
        assert!(miner.verify(7, proof));

        let other = miner.solve(8);
        assert!(miner.verify(8, other));
        assert_eq!(miner.verify(7, other), proof_digest(7, other).starts_with("0000"));
    }
}
