// Ledger node - the service object behind the HTTP API

use crate::config::{random_node_id, NodeConfig};
use crate::consensus::{ChainSource, ConsensusResolver, Miner, Resolution};
use crate::core::{Block, Transaction, MINING_REWARD, REWARD_SENDER};
use crate::ledger::Ledger;
use crate::network::{HttpChainSource, PeerSet};
use tokio::sync::RwLock;

/// Ledger node
///
/// Constructed once at startup and shared (behind an `Arc`) by every
/// request handler. The ledger lock is the single critical section for
/// draining the pool and appending a block.
pub struct Node {
    /// Recipient of this node's mining rewards
    node_id: String,
    /// Chain and pending pool
    ledger: RwLock<Ledger>,
    /// Registered peers
    peers: RwLock<PeerSet>,
    miner: Miner,
    resolver: ConsensusResolver,
    source: HttpChainSource,
}

impl Node {
    /// Create a new node from its configuration
    pub fn new(config: &NodeConfig) -> Result<Self, String> {
        let mut peers = PeerSet::new();
        peers.register_all(config.peers.as_slice())?;

        let node_id = config.node_id.clone().unwrap_or_else(random_node_id);
        log::info!("Node identifier: {}", node_id);

        Ok(Self {
            node_id,
            ledger: RwLock::new(Ledger::new()),
            peers: RwLock::new(peers),
            miner: Miner::new(),
            resolver: ConsensusResolver::new(),
            source: HttpChainSource::new(config.peer_timeout)?,
        })
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Snapshot of the full chain
    pub async fn chain(&self) -> Vec<Block> {
        self.ledger.read().await.chain().to_vec()
    }

    /// Snapshot of the pending pool
    pub async fn pending(&self) -> Vec<Transaction> {
        self.ledger.read().await.pending().to_vec()
    }

    /// Queue a transaction; returns the block index it should land in
    pub async fn submit_transaction(&self, sender: String, recipient: String, amount: u64) -> u64 {
        let index = self.ledger.write().await.new_transaction(sender, recipient, amount);
        log::debug!("Queued transaction for block {}", index);
        index
    }

    /// Mine one block on top of the current tip.
    ///
    /// The proof search runs on the blocking pool without holding any
    /// lock. If the tip changed meanwhile (a block was forged or the
    /// chain was replaced), the proof is stale and the search restarts
    /// against the new tip.
    pub async fn mine(&self) -> Result<Block, String> {
        loop {
            let tip = self.ledger.read().await.last_block().clone();

            let miner = self.miner;
            let last_proof = tip.proof;
            let result = tokio::task::spawn_blocking(move || miner.mine(last_proof))
                .await
                .map_err(|e| format!("Mining task failed: {}", e))?;

            let mut ledger = self.ledger.write().await;
            if ledger.last_block() != &tip {
                log::warn!("Chain tip moved while mining on block {}; retrying", tip.index);
                continue;
            }

            ledger.new_transaction(REWARD_SENDER, self.node_id.as_str(), MINING_REWARD);
            let block = ledger.new_block(result.proof, None);

            log::info!(
                "Forged block {} (proof {}, {} attempts in {:?}, {} transactions)",
                block.index,
                block.proof,
                result.attempts,
                result.duration,
                block.transactions.len()
            );
            return Ok(block);
        }
    }

    /// Register peers; returns the full peer list afterwards
    pub async fn register_peers<S: AsRef<str>>(&self, addresses: &[S]) -> Result<Vec<String>, String> {
        let mut peers = self.peers.write().await;
        peers.register_all(addresses)?;
        Ok(peers.addresses())
    }

    /// Known peers
    pub async fn peers(&self) -> Vec<String> {
        self.peers.read().await.addresses()
    }

    /// Run consensus against all registered peers over HTTP
    pub async fn resolve(&self) -> Result<Resolution, String> {
        self.resolve_with(&self.source).await
    }

    /// Run consensus against all registered peers using `source`.
    ///
    /// Peers are queried without holding the ledger lock. The winning
    /// chain is installed only if it is still strictly longer than the
    /// local chain at that point.
    pub async fn resolve_with<S>(&self, source: &S) -> Result<Resolution, String>
    where
        S: ChainSource + Sync,
    {
        let local = self.chain().await;
        let peers = self.peers().await;

        let mut resolution = self.resolver.resolve(&local, &peers, source).await;
        if !resolution.replaced {
            return Ok(resolution);
        }

        let mut ledger = self.ledger.write().await;
        if resolution.chain.len() > ledger.len() {
            ledger.replace_chain(resolution.chain.clone())?;
        } else {
            log::warn!(
                "Local chain grew to {} blocks during resolution; keeping it",
                ledger.len()
            );
            resolution.replaced = false;
            resolution.winner = None;
            resolution.chain = ledger.chain().to_vec();
        }

        Ok(resolution)
    }
}
