// In-memory ledger node for tests and offline use

use super::{AssetRecord, Block, LedgerClient, LedgerError, OutputRef, TxStatus, Vote};
use crate::tx::{Operation, Transaction};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Default)]
struct MockState {
    /// Insertion order is the order `list_transactions` returns
    transactions: Vec<Transaction>,
    blocks: Vec<Block>,
    votes: HashMap<String, Vec<Vote>>,
}

/// Mock implementation of LedgerClient
pub struct MockLedgerClient {
    state: Mutex<MockState>,
    undecided_polls: usize,
    reject: bool,
    post_failure: Option<String>,
    delay_ms: u64,
    post_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl MockLedgerClient {
    /// Create an empty node that commits everything on the first poll
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            undecided_polls: 0,
            reject: false,
            post_failure: None,
            delay_ms: 0,
            post_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Preload transactions, kept in the given order
    pub fn with_transactions(self, transactions: impl IntoIterator<Item = Transaction>) -> Self {
        self.lock().transactions.extend(transactions);
        self
    }

    pub fn with_block(self, block: Block) -> Self {
        self.lock().blocks.push(block);
        self
    }

    pub fn with_votes(self, block_id: &str, votes: Vec<Vote>) -> Self {
        self.lock().votes.insert(block_id.to_string(), votes);
        self
    }

    /// Report `Undecided` for the first `polls` status calls
    pub fn with_undecided_polls(mut self, polls: usize) -> Self {
        self.undecided_polls = polls;
        self
    }

    /// Report every submitted transaction as `Invalid`
    pub fn with_rejection(mut self) -> Self {
        self.reject = true;
        self
    }

    /// Fail every post with `message`
    pub fn with_post_failure(mut self, message: &str) -> Self {
        self.post_failure = Some(message.to_string());
        self
    }

    /// Sleep before answering posts and status calls
    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Number of `post_transaction` calls so far
    pub fn post_calls(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_status` calls so far
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Transactions currently held, in insertion order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }
}

impl Default for MockLedgerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, LedgerError> {
        self.lock()
            .transactions
            .iter()
            .find(|tx| tx.id() == transaction_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(transaction_id.to_string()))
    }

    async fn list_transactions(
        &self,
        asset_id: &str,
        operation: Option<Operation>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .lock()
            .transactions
            .iter()
            .filter(|tx| tx.asset_id() == Some(asset_id))
            .filter(|tx| operation.map_or(true, |op| tx.operation() == op))
            .cloned()
            .collect())
    }

    async fn list_outputs(
        &self,
        public_key: &str,
        spent: Option<bool>,
    ) -> Result<Vec<OutputRef>, LedgerError> {
        let state = self.lock();
        let consumed: Vec<(&str, u32)> = state
            .transactions
            .iter()
            .flat_map(|tx| tx.inputs())
            .filter_map(|input| input.fulfills.as_ref())
            .map(|f| (f.transaction_id.as_str(), f.output_index))
            .collect();

        let mut outputs = Vec::new();
        for tx in &state.transactions {
            for (index, output) in tx.outputs().iter().enumerate() {
                if !output.public_keys.iter().any(|key| key == public_key) {
                    continue;
                }
                let output_index = index as u32;
                let is_spent = consumed.contains(&(tx.id(), output_index));
                if spent.map_or(true, |wanted| wanted == is_spent) {
                    outputs.push(OutputRef {
                        transaction_id: tx.id().to_string(),
                        output_index,
                    });
                }
            }
        }
        Ok(outputs)
    }

    async fn get_block(&self, block_id: &str) -> Result<Block, LedgerError> {
        self.lock()
            .blocks
            .iter()
            .find(|block| block.id == block_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(block_id.to_string()))
    }

    async fn list_blocks(&self, transaction_id: &str) -> Result<Vec<String>, LedgerError> {
        Ok(self
            .lock()
            .blocks
            .iter()
            .filter(|block| block.contains(transaction_id))
            .map(|block| block.id.clone())
            .collect())
    }

    async fn list_votes(&self, block_id: &str) -> Result<Vec<Vote>, LedgerError> {
        Ok(self.lock().votes.get(block_id).cloned().unwrap_or_default())
    }

    async fn search_assets(&self, text: &str) -> Result<Vec<AssetRecord>, LedgerError> {
        Ok(self
            .lock()
            .transactions
            .iter()
            .filter(|tx| tx.is_create())
            .filter_map(|tx| {
                let data = tx.asset().data.as_ref()?;
                data.to_string().contains(text).then(|| AssetRecord {
                    id: tx.id().to_string(),
                    data: data.clone(),
                })
            })
            .collect())
    }

    async fn post_transaction(&self, transaction: &Transaction) -> Result<(), LedgerError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;

        if let Some(message) = &self.post_failure {
            return Err(LedgerError::Unavailable(message.clone()));
        }

        self.lock().transactions.push(transaction.clone());
        Ok(())
    }

    async fn get_status(&self, transaction_id: &str) -> Result<TxStatus, LedgerError> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;

        let known = self
            .lock()
            .transactions
            .iter()
            .any(|tx| tx.id() == transaction_id);
        if !known {
            return Err(LedgerError::NotFound(transaction_id.to_string()));
        }

        if self.reject {
            Ok(TxStatus::Invalid)
        } else if call < self.undecided_polls {
            Ok(TxStatus::Undecided)
        } else {
            Ok(TxStatus::Valid)
        }
    }
}
