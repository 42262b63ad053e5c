// Chain validation

use crate::core::Block;
use crate::consensus::pow::Miner;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Chain has no blocks at all
    EmptyChain,
    /// Block index doesn't follow its predecessor
    InvalidIndex { expected: u64, found: u64 },
    /// previous_hash doesn't match the digest of the preceding block
    InvalidPreviousHash { index: u64 },
    /// Proof doesn't solve the puzzle posed by the preceding proof
    InvalidProofOfWork { index: u64 },
    /// Peer reported a length that differs from the chain it sent
    LengthMismatch { reported: usize, actual: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ValidationError::EmptyChain => write!(f, "Chain is empty"),
            ValidationError::InvalidIndex { expected, found } => {
                write!(f, "Invalid block index: expected {}, found {}", expected, found)
            }
            ValidationError::InvalidPreviousHash { index } => {
                write!(f, "Invalid previous hash in block {}", index)
            }
            ValidationError::InvalidProofOfWork { index } => {
                write!(f, "Invalid proof of work in block {}", index)
            }
            ValidationError::LengthMismatch { reported, actual } => {
                write!(f, "Reported length {} but chain has {} blocks", reported, actual)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Chain validator
///
/// Independent of any local ledger: it only looks at the chain it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainValidator {
    /// PoW miner for verification
    miner: Miner,
}

impl ChainValidator {
    /// Create a new chain validator at the fixed difficulty
    pub fn new() -> Self {
        Self {
            miner: Miner::new(),
        }
    }

    /// Validate a whole chain, reporting the first failure.
    ///
    /// The genesis block is never checked against a predecessor.
    pub fn validate_chain(&self, chain: &[Block]) -> Result<(), ValidationError> {
        let first = chain.first().ok_or(ValidationError::EmptyChain)?;
        if !first.is_genesis() {
            return Err(ValidationError::InvalidIndex {
                expected: 1,
                found: first.index,
            });
        }

        for pair in chain.windows(2) {
            self.validate_link(&pair[0], &pair[1])?;
        }

        Ok(())
    }

    /// Check that `block` correctly follows `prev`
    pub fn validate_link(&self, prev: &Block, block: &Block) -> Result<(), ValidationError> {
        if block.index != prev.index + 1 {
            return Err(ValidationError::InvalidIndex {
                expected: prev.index + 1,
                found: block.index,
            });
        }

        if block.previous_hash != prev.hash() {
            return Err(ValidationError::InvalidPreviousHash { index: block.index });
        }

        if !self.miner.verify(prev.proof, block.proof) {
            return Err(ValidationError::InvalidProofOfWork { index: block.index });
        }

        Ok(())
    }

    /// Boolean form of [`ChainValidator::validate_chain`]
    pub fn is_valid(&self, chain: &[Block]) -> bool {
        match self.validate_chain(chain) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Chain rejected: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;
    use crate::ledger::{test_support, Ledger};

    #[test]
    fn test_genesis_only_chain_is_valid() {
        let ledger = Ledger::new();
        assert!(ChainValidator::new().is_valid(ledger.chain()));
    }

    #[test]
    fn test_empty_chain_rejected() {
        let validator = ChainValidator::new();
        assert_eq!(validator.validate_chain(&[]), Err(ValidationError::EmptyChain));
        assert!(!validator.is_valid(&[]));
    }

    #[test]
    fn test_mined_chain_is_valid() {
        let chain = test_support::shared_chain(8);
        assert_eq!(ChainValidator::new().validate_chain(&chain), Ok(()));
    }

    #[test]
    fn test_tampered_previous_hash() {
        let mut chain = test_support::shared_chain(3);
        chain[2].previous_hash = "0".repeat(64);

        assert_eq!(
            ChainValidator::new().validate_chain(&chain),
            Err(ValidationError::InvalidPreviousHash { index: 3 })
        );
    }

    #[test]
    fn test_tampered_transaction_breaks_link() {
        let mut chain = test_support::shared_chain(3);
        chain[1].transactions.push(Transaction::new("mallory", "mallory", 1_000));

        // Block 2's content changed, so block 3 no longer points at it
        assert_eq!(
            ChainValidator::new().validate_chain(&chain),
            Err(ValidationError::InvalidPreviousHash { index: 3 })
        );
    }

    #[test]
    fn test_invalid_proof() {
        let mut ledger = Ledger::new();
        // Proof 0 does not solve the genesis puzzle
        ledger.new_block(0, None);

        assert_eq!(
            ChainValidator::new().validate_chain(ledger.chain()),
            Err(ValidationError::InvalidProofOfWork { index: 2 })
        );
    }

    #[test]
    fn test_index_gap_rejected() {
        let mut chain = test_support::shared_chain(2);
        chain[1].index = 5;

        assert_eq!(
            ChainValidator::new().validate_chain(&chain),
            Err(ValidationError::InvalidIndex { expected: 2, found: 5 })
        );

        let mut chain = Ledger::new().chain().to_vec();
        chain[0].index = 0;
        assert!(!ChainValidator::new().is_valid(&chain));
    }
}
