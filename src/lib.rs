// Proof-of-work ledger node
// Hash-linked blocks, a fixed-difficulty puzzle and longest-valid-chain consensus

pub mod core;
pub mod consensus;
pub mod ledger;
pub mod network;
pub mod config;
pub mod cli;

// Re-exports for convenience
pub use self::core::{Block, Transaction, digest};
pub use consensus::{Miner, ChainValidator, ConsensusResolver, ValidationError, FetchError};
pub use ledger::Ledger;
pub use network::{Node, PeerSet, HttpChainSource};
pub use config::NodeConfig;
pub use cli::{Cli, handle};
