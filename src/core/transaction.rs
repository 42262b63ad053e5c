// Transaction data structures

use serde::{Deserialize, Serialize};

/// Sender used for the mining reward (no real account behind it)
pub const REWARD_SENDER: &str = "0";

/// Amount paid to the node that forges a block
pub const MINING_REWARD: u64 = 1;

/// A value transfer waiting in the pool or embedded in a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender identifier
    pub sender: String,
    /// Recipient identifier
    pub recipient: String,
    /// Amount transferred
    pub amount: u64,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Create the reward transaction paid to the miner of a block
    pub fn reward(recipient: impl Into<String>) -> Self {
        Self::new(REWARD_SENDER, recipient, MINING_REWARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_transaction() {
        let tx = Transaction::reward("node-a");
        assert_eq!(tx.sender, REWARD_SENDER);
        assert_eq!(tx.recipient, "node-a");
        assert_eq!(tx.amount, MINING_REWARD);
    }

    #[test]
    fn test_json_field_names() {
        let tx = Transaction::new("alice", "bob", 5);
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["sender"], "alice");
        assert_eq!(json["recipient"], "bob");
        assert_eq!(json["amount"], 5);
    }
}
