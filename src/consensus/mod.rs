// Consensus: proof of work, chain validation and conflict resolution

pub mod pow;
pub mod validation;
pub mod resolve;

pub use pow::{Miner, Target, MiningResult};
pub use validation::{ChainValidator, ValidationError};
pub use resolve::{
    ChainSource, ConsensusResolver, FetchError, PeerOutcome, PeerReport, ReportedChain, Resolution,
};
