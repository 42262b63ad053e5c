// Core ledger data structures

mod transaction;
mod block;
pub mod hash;

pub use transaction::*;
pub use block::*;
pub use hash::{digest, sha256_hex};
