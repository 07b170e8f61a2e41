// The ledger node as seen from the client

use super::{AssetRecord, Block, OutputRef, TxStatus, Vote};
use crate::tx::{Operation, Transaction};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a ledger client
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Node returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Node unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LedgerError::Decode(err.to_string())
        } else {
            LedgerError::Request(err.to_string())
        }
    }
}

/// Read and write access to a ledger node
///
/// Transaction lists come back in whatever order the node keeps them and may
/// be incomplete.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch one transaction
    async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, LedgerError>;

    /// All transactions of an asset, optionally only one operation kind
    async fn list_transactions(
        &self,
        asset_id: &str,
        operation: Option<Operation>,
    ) -> Result<Vec<Transaction>, LedgerError>;

    /// Outputs owned by `public_key`; `spent` filters on spent state when set
    async fn list_outputs(
        &self,
        public_key: &str,
        spent: Option<bool>,
    ) -> Result<Vec<OutputRef>, LedgerError>;

    /// Fetch one block
    async fn get_block(&self, block_id: &str) -> Result<Block, LedgerError>;

    /// Ids of the blocks containing `transaction_id`
    async fn list_blocks(&self, transaction_id: &str) -> Result<Vec<String>, LedgerError>;

    /// Votes cast on `block_id`
    async fn list_votes(&self, block_id: &str) -> Result<Vec<Vote>, LedgerError>;

    /// Full-text search over asset payloads
    async fn search_assets(&self, text: &str) -> Result<Vec<AssetRecord>, LedgerError>;

    /// Hand a signed transaction to the node
    async fn post_transaction(&self, transaction: &Transaction) -> Result<(), LedgerError>;

    /// Current commit status of a submitted transaction
    async fn get_status(&self, transaction_id: &str) -> Result<TxStatus, LedgerError>;
}
