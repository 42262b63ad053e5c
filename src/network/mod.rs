// Node networking: peers, peer client and HTTP API

mod peer;
mod client;
mod node;
pub mod api;

pub use peer::{normalize_address, PeerSet};
pub use client::HttpChainSource;
pub use node::Node;
