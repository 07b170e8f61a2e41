// Connection - high-level operations over a ledger node
// Prepares and signs locally, submits and waits for commit, and reads back
// an asset's history in chain order.

use super::{AssetRecord, Block, HttpLedgerClient, LedgerClient, LedgerError, OutputRef, TxStatus, Vote};
use crate::chain::{ChainReconstructor, ReconstructedChain};
use crate::identity::{Keypair, PublicKey};
use crate::tx::{Operation, Transaction, TransactionBody, TransactionBuilder, TransactionError};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// CONNECTION CONFIG
// ============================================================================

/// Configuration for a connection
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Delay between status polls in milliseconds
    pub poll_interval_ms: u64,
    /// Status polls before giving up on a commit
    pub max_poll_attempts: u32,
    /// Upper bound on submit plus commit wait, in seconds
    pub timeout_secs: u64,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
}

impl ConnectionConfig {
    /// Create a new config with builder pattern
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the poll interval in milliseconds
    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the maximum number of status polls
    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    /// Set the timeout in seconds
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Add a request header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConnectionError> {
        if self.timeout_secs == 0 {
            return Err(ConnectionError::InvalidConfig(
                "timeout_secs must be > 0".to_string(),
            ));
        }
        if self.max_poll_attempts == 0 {
            return Err(ConnectionError::InvalidConfig(
                "max_poll_attempts must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            max_poll_attempts: 20,
            timeout_secs: 60,
            headers: HashMap::new(),
        }
    }
}

// ============================================================================
// CONNECTION ERROR
// ============================================================================

/// Errors that can occur while talking to the ledger
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Transaction {0} was rejected by the network")]
    Rejected(String),

    #[error("Transaction {transaction_id} not committed after {attempts} polls")]
    NotCommitted { transaction_id: String, attempts: u32 },

    #[error("Timed out waiting for transaction {0}")]
    Timeout(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// ============================================================================
// CONNECTION
// ============================================================================

/// High-level handle on a ledger node
pub struct Connection<C: LedgerClient> {
    client: C,
    config: ConnectionConfig,
}

impl Connection<HttpLedgerClient> {
    /// Connect to a node's HTTP API at `node_url`
    pub fn http(node_url: &str, config: ConnectionConfig) -> Result<Self, ConnectionError> {
        let client = HttpLedgerClient::new(node_url).with_headers(&config.headers)?;
        Self::new(client, config)
    }
}

impl<C: LedgerClient> Connection<C> {
    /// Wrap an existing client
    pub fn new(client: C, config: ConnectionConfig) -> Result<Self, ConnectionError> {
        config.validate()?;
        Ok(Self { client, config })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Asset a transaction belongs to: its own id for CREATE, the linked id for TRANSFER
    pub fn get_asset_id<'t>(&self, transaction: &'t Transaction) -> Option<&'t str> {
        transaction.asset_id()
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, ConnectionError> {
        Ok(self.client.get_transaction(transaction_id).await?)
    }

    pub async fn list_transactions(
        &self,
        asset_id: &str,
        operation: Option<Operation>,
    ) -> Result<Vec<Transaction>, ConnectionError> {
        Ok(self.client.list_transactions(asset_id, operation).await?)
    }

    pub async fn list_outputs(
        &self,
        public_key: &str,
        spent: Option<bool>,
    ) -> Result<Vec<OutputRef>, ConnectionError> {
        Ok(self.client.list_outputs(public_key, spent).await?)
    }

    pub async fn get_block(&self, block_id: &str) -> Result<Block, ConnectionError> {
        Ok(self.client.get_block(block_id).await?)
    }

    /// Every block containing `transaction_id`, fetched in the order the node lists them
    pub async fn list_blocks(&self, transaction_id: &str) -> Result<Vec<Block>, ConnectionError> {
        let block_ids = self.client.list_blocks(transaction_id).await?;
        let mut blocks = Vec::with_capacity(block_ids.len());
        for block_id in &block_ids {
            blocks.push(self.client.get_block(block_id).await?);
        }
        Ok(blocks)
    }

    pub async fn list_votes(&self, block_id: &str) -> Result<Vec<Vote>, ConnectionError> {
        Ok(self.client.list_votes(block_id).await?)
    }

    pub async fn search_assets(&self, text: &str) -> Result<Vec<AssetRecord>, ConnectionError> {
        Ok(self.client.search_assets(text).await?)
    }

    /// Unsigned CREATE of `asset_data` with a single output of 1 to `public_key`
    pub fn prepare_transaction(
        &self,
        public_key: &PublicKey,
        asset_data: Value,
        metadata: Option<Value>,
    ) -> Result<TransactionBody, ConnectionError> {
        let mut builder = TransactionBuilder::create()
            .issuer(public_key)
            .asset_data(asset_data)
            .output(public_key, 1);
        if let Some(metadata) = metadata {
            builder = builder.metadata(metadata);
        }
        Ok(builder.build()?)
    }

    /// Sign every input of `body` with `keypair`
    pub fn fulfill_transaction(
        &self,
        body: TransactionBody,
        keypair: &Keypair,
    ) -> Result<Transaction, ConnectionError> {
        Ok(body.sign(keypair)?)
    }

    /// Submit an already signed transaction and wait until it is committed
    pub async fn signed_create_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, ConnectionError> {
        self.commit(transaction).await
    }

    /// Prepare, sign and submit a CREATE owned by `keypair`
    pub async fn create_transaction(
        &self,
        keypair: &Keypair,
        asset_data: Value,
        metadata: Option<Value>,
    ) -> Result<Transaction, ConnectionError> {
        let body = self.prepare_transaction(&keypair.public_key(), asset_data, metadata)?;
        let transaction = self.fulfill_transaction(body, keypair)?;
        self.commit(transaction).await
    }

    /// Spend output 0 of `previous` to `to`, signed by `from`, and submit it
    pub async fn transfer_transaction(
        &self,
        previous: &Transaction,
        from: &Keypair,
        to: &PublicKey,
        metadata: Option<Value>,
    ) -> Result<Transaction, ConnectionError> {
        let amount = previous
            .outputs()
            .first()
            .and_then(|output| output.amount())
            .unwrap_or(1);

        let mut builder = TransactionBuilder::transfer(previous, 0).output(to, amount);
        if let Some(metadata) = metadata {
            builder = builder.metadata(metadata);
        }
        let transaction = builder.build()?.sign(from)?;
        self.commit(transaction).await
    }

    /// Poll the node until `transaction_id` is decided, then fetch it
    ///
    /// A node that does not know the id yet counts as still pending.
    pub async fn poll_status_and_fetch_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Transaction, ConnectionError> {
        let attempts = self.config.max_poll_attempts;
        for attempt in 1..=attempts {
            match self.client.get_status(transaction_id).await {
                Ok(TxStatus::Valid) => {
                    info!(transaction_id, attempt, "transaction committed");
                    return self.get_transaction(transaction_id).await;
                }
                Ok(TxStatus::Invalid) => {
                    return Err(ConnectionError::Rejected(transaction_id.to_string()));
                }
                Ok(status) => debug!(transaction_id, attempt, ?status, "not committed yet"),
                Err(LedgerError::NotFound(_)) => {
                    debug!(transaction_id, attempt, "not known to node yet")
                }
                Err(e) => return Err(e.into()),
            }

            if attempt < attempts && self.config.poll_interval_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms)).await;
            }
        }

        Err(ConnectionError::NotCommitted {
            transaction_id: transaction_id.to_string(),
            attempts,
        })
    }

    /// Transactions of `asset_id` ordered from CREATE to the current tip
    ///
    /// Falls back to node order when no tip can be found; see
    /// [`ChainReconstructor::reconstruct`].
    pub async fn get_sorted_transactions(
        &self,
        asset_id: &str,
    ) -> Result<Vec<Transaction>, ConnectionError> {
        let transactions = self.client.list_transactions(asset_id, None).await?;
        Ok(ChainReconstructor::reconstruct(transactions))
    }

    /// Like [`get_sorted_transactions`](Self::get_sorted_transactions) but keeps the warnings
    pub async fn get_sorted_transactions_checked(
        &self,
        asset_id: &str,
    ) -> Result<ReconstructedChain, ConnectionError> {
        let transactions = self.client.list_transactions(asset_id, None).await?;
        Ok(ChainReconstructor::reconstruct_checked(transactions))
    }

    async fn commit(&self, transaction: Transaction) -> Result<Transaction, ConnectionError> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let outcome = tokio::time::timeout(timeout, self.post_and_poll(&transaction)).await;

        match outcome {
            Ok(Ok(_)) => Ok(transaction),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ConnectionError::Timeout(transaction.id().to_string())),
        }
    }

    async fn post_and_poll(&self, transaction: &Transaction) -> Result<Transaction, ConnectionError> {
        self.client.post_transaction(transaction).await?;
        info!(
            transaction_id = transaction.id(),
            operation = %transaction.operation(),
            "transaction submitted"
        );
        self.poll_status_and_fetch_transaction(transaction.id()).await
    }
}
