// In-memory ledger: the chain and the pending transaction pool

use crate::core::{Block, Transaction, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};

/// Ledger - owns the block sequence and the pending pool
///
/// The chain always holds at least the genesis block.
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create a ledger seeded with the standard genesis block
    pub fn new() -> Self {
        Self::with_genesis(GENESIS_PROOF, GENESIS_PREVIOUS_HASH)
    }

    /// Create a ledger with a custom genesis proof and sentinel
    pub fn with_genesis(proof: u64, previous_hash: &str) -> Self {
        Self {
            chain: vec![Block::genesis(proof, previous_hash)],
            pending: Vec::new(),
        }
    }

    /// Forge a block from the pending pool and append it.
    ///
    /// `previous_hash` defaults to the digest of the current last block.
    /// The pool is drained into the new block.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> Block {
        let previous_hash = previous_hash.unwrap_or_else(|| self.last_block().hash());
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);

        let block = Block::new(index, transactions, proof, previous_hash);
        self.chain.push(block.clone());
        block
    }

    /// Queue a transaction for the next block.
    ///
    /// Returns the index of the block it is expected to land in. This is
    /// only advisory: another block may be forged first.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, recipient, amount));
        self.last_block().index + 1
    }

    /// The most recently appended block
    pub fn last_block(&self) -> &Block {
        self.chain.last().expect("chain always holds the genesis block")
    }

    /// All blocks, genesis first
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Number of blocks in the chain
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always false for a constructed ledger
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Transactions not yet bound to a block
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Swap in a whole new chain. The pending pool is kept.
    pub fn replace_chain(&mut self, chain: Vec<Block>) -> Result<(), String> {
        if chain.is_empty() {
            return Err("Cannot replace the chain with an empty one".to_string());
        }

        log::info!("Replacing chain: {} -> {} blocks", self.chain.len(), chain.len());
        self.chain = chain;
        Ok(())
    }
}

/// Helpers for building valid chains in tests
#[cfg(test)]
pub(crate) mod test_support {
    use super::Ledger;
    use crate::consensus::Miner;
    use crate::core::Block;
    use std::sync::OnceLock;

    /// Mine blocks on `ledger` until it holds `len` blocks
    pub fn extend_to(ledger: &mut Ledger, len: usize) {
        let miner = Miner::new();
        while ledger.len() < len {
            let proof = miner.solve(ledger.last_block().proof);
            ledger.new_transaction("tester", "peer", ledger.len() as u64);
            ledger.new_block(proof, None);
        }
    }

    /// A fresh ledger mined out to `len` blocks
    pub fn mined_ledger(len: usize) -> Ledger {
        let mut ledger = Ledger::new();
        extend_to(&mut ledger, len);
        ledger
    }

    /// First `len` blocks of a valid chain mined once per test binary
    pub fn shared_chain(len: usize) -> Vec<Block> {
        static LEDGER: OnceLock<Ledger> = OnceLock::new();
        let ledger = LEDGER.get_or_init(|| mined_ledger(8));
        ledger.chain()[..len].to_vec()
    }
}
