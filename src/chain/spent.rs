// Spent-set bookkeeping over a batch of fetched transactions

use crate::tx::Transaction;
use std::collections::HashMap;

/// Which transaction ids are consumed by which transactions in a batch
#[derive(Clone, Debug, Default)]
pub struct SpentSet {
    spent: HashMap<String, Vec<String>>,
}

impl SpentSet {
    /// Create a new empty spent set
    pub fn new() -> Self {
        Self {
            spent: HashMap::new(),
        }
    }

    /// Collect every `fulfills` target of every input in `transactions`
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut set = Self::new();
        for tx in transactions {
            for spent_id in tx.spent_ids() {
                set.record(spent_id, tx.id());
            }
        }
        set
    }

    /// Record that `spender_id` consumes an output of `spent_id`
    pub fn record(&mut self, spent_id: &str, spender_id: &str) {
        self.spent
            .entry(spent_id.to_string())
            .or_default()
            .push(spender_id.to_string());
    }

    /// Whether some transaction in the batch spends from `transaction_id`
    pub fn contains(&self, transaction_id: &str) -> bool {
        self.spent.contains_key(transaction_id)
    }

    /// Transactions spending from `transaction_id`, in batch order
    pub fn spenders(&self, transaction_id: &str) -> &[String] {
        self.spent
            .get(transaction_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Spent ids, sorted
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.spent.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of distinct spent transaction ids
    pub fn len(&self) -> usize {
        self.spent.len()
    }

    /// Check if nothing is spent
    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}
