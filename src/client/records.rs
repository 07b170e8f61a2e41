// Read-side records returned by a ledger node

use crate::tx::Transaction;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Commit status of a submitted transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Accepted, not yet in a block
    Backlog,
    /// In a block whose vote is still open
    Undecided,
    /// In a block voted valid
    Valid,
    /// Rejected by the network
    Invalid,
}

impl TxStatus {
    /// Whether polling can stop
    pub fn is_final(&self) -> bool {
        matches!(self, TxStatus::Valid | TxStatus::Invalid)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub block: BlockBody,
    #[serde(default)]
    pub signature: Option<String>,
}

impl Block {
    /// Unsigned block holding `transactions`
    pub fn new(id: impl Into<String>, transactions: Vec<Transaction>) -> Self {
        Self {
            id: id.into(),
            block: BlockBody {
                timestamp: String::new(),
                transactions,
                node_pubkey: String::new(),
                voters: Vec::new(),
            },
            signature: None,
        }
    }

    /// Whether the block includes `transaction_id`
    pub fn contains(&self, transaction_id: &str) -> bool {
        self.block
            .transactions
            .iter()
            .any(|tx| tx.id() == transaction_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBody {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub node_pubkey: String,
    #[serde(default)]
    pub voters: Vec<String>,
}

/// A node's vote on a block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub node_pubkey: String,
    #[serde(default)]
    pub signature: String,
    pub vote: VoteBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteBody {
    pub voting_for_block: String,
    #[serde(default)]
    pub previous_block: String,
    pub is_block_valid: bool,
    #[serde(default)]
    pub invalid_reason: Option<String>,
    #[serde(default)]
    pub timestamp: String,
}

/// Reference to one output of one transaction
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    pub transaction_id: String,
    pub output_index: u32,
}

/// Asset payload hit from a text search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    #[serde(default)]
    pub data: Value,
}
