// CLI commands

use clap::{Args, Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{NodeConfig, DEFAULT_PORT};
use crate::consensus::Miner;
use crate::network::{api, Node};

#[derive(Parser)]
#[command(name = "pow-ledger")]
#[command(about = "Proof-of-work ledger node", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a node and serve its HTTP API
    Serve(ServeArgs),

    /// Search for the proof that follows `last_proof`
    Solve {
        /// Proof of the previous block
        last_proof: u64,
    },
}

#[derive(Args)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Peer to register at startup (repeatable)
    #[arg(long = "peer")]
    pub peers: Vec<String>,
    /// Identifier credited with mining rewards
    #[arg(long)]
    pub node_id: Option<String>,
    /// Timeout for each peer chain request, in seconds
    #[arg(long, default_value = "5")]
    pub peer_timeout_secs: u64,
}

impl ServeArgs {
    /// Node configuration described by these flags
    pub fn to_config(&self) -> NodeConfig {
        NodeConfig {
            listen_addr: SocketAddr::new(self.host, self.port),
            peers: self.peers.clone(),
            node_id: self.node_id.clone(),
            peer_timeout: Duration::from_secs(self.peer_timeout_secs),
        }
    }
}

/// Handle CLI command
pub async fn handle(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Serve(args) => serve(args.to_config()).await,
        Commands::Solve { last_proof } => {
            solve(last_proof);
            Ok(())
        }
    }
}

/// Start a node and block on its API server
async fn serve(config: NodeConfig) -> Result<(), String> {
    let node = Arc::new(Node::new(&config)?);

    let peers = node.peers().await;
    if !peers.is_empty() {
        log::info!("Starting with {} peers: {}", peers.len(), peers.join(", "));
    }

    api::serve(node, config.listen_addr).await
}

/// Run the proof search offline and print the result
fn solve(last_proof: u64) {
    let miner = Miner::new();
    println!(
        "Searching for proof after {} ({} leading zeros)...\n",
        last_proof,
        miner.target.leading_zeros()
    );

    let result = miner.mine(last_proof);

    println!("✓ Proof found!\n");
    println!("Proof: {}", result.proof);
    println!("Digest: {}", result.digest);
    println!("Attempts: {}", result.attempts);
    println!("Duration: {:?}", result.duration);
    println!("Hash rate: {:.2} H/s", result.hash_rate());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from([
            "pow-ledger", "serve", "--port", "5001", "--peer", "localhost:5000",
            "--peer", "http://localhost:5002", "--node-id", "abc",
        ])
        .unwrap();

        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.to_config();
        assert_eq!(config.listen_addr, "0.0.0.0:5001".parse::<SocketAddr>().unwrap());
        assert_eq!(config.peers, vec!["localhost:5000", "http://localhost:5002"]);
        assert_eq!(config.node_id.as_deref(), Some("abc"));
        assert_eq!(config.peer_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_parse_solve() {
        let cli = Cli::try_parse_from(["pow-ledger", "solve", "100"]).unwrap();
        assert!(matches!(cli.command, Commands::Solve { last_proof: 100 }));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pow-ledger", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.to_config();
        assert_eq!(config.listen_addr.port(), DEFAULT_PORT);
        assert!(config.peers.is_empty());
        assert!(config.node_id.is_none());
    }
}
