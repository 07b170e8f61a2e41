// Ordering an asset's transactions from CREATE root to current tip

use super::SpentSet;
use crate::tx::Transaction;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

/// Why a reconstructed chain is not a clean root-to-tip path over the whole input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainWarning {
    /// Every transaction is spent by another; the input is returned unordered
    Malformed { spent: Vec<String> },
    /// Several unspent transactions; the first in input order was taken as the tip
    Forked { tips: Vec<String> },
    /// The walk reached a predecessor that is not in the input
    Truncated { missing: String },
    /// The walk came back to a transaction it had already visited
    Cycle { at: String },
    /// Transactions left off the tip's path
    Unreached { count: usize },
}

impl fmt::Display for ChainWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainWarning::Malformed { spent } => write!(
                f,
                "no unspent transaction among the input ({} spent ids); left unordered",
                spent.len()
            ),
            ChainWarning::Forked { tips } => write!(
                f,
                "{} unspent transactions, using {} as tip",
                tips.len(),
                tips.first().map(String::as_str).unwrap_or("?")
            ),
            ChainWarning::Truncated { missing } => {
                write!(f, "predecessor {} not in input; chain truncated", missing)
            }
            ChainWarning::Cycle { at } => write!(f, "cycle detected at {}", at),
            ChainWarning::Unreached { count } => {
                write!(f, "{} transactions not on the tip's path", count)
            }
        }
    }
}

/// Output of [`ChainReconstructor::reconstruct_checked`]
#[derive(Clone, Debug)]
pub struct ReconstructedChain {
    transactions: Vec<Transaction>,
    warnings: Vec<ChainWarning>,
}

impl ReconstructedChain {
    fn new(transactions: Vec<Transaction>, warnings: Vec<ChainWarning>) -> Self {
        Self {
            transactions,
            warnings,
        }
    }

    /// Transactions, root first (or input order for a malformed chain)
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    pub fn warnings(&self) -> &[ChainWarning] {
        &self.warnings
    }

    /// True when every input transaction sits on one unbroken root-to-tip path
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// True when the input could not be ordered at all
    pub fn is_malformed(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, ChainWarning::Malformed { .. }))
    }

    pub fn root(&self) -> Option<&Transaction> {
        self.transactions.first()
    }

    pub fn tip(&self) -> Option<&Transaction> {
        self.transactions.last()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Rebuilds the provenance chain of one asset
///
/// The tip is the transaction nothing else in the batch spends from. From
/// there the walk follows each transaction's *first* input back to its
/// predecessor until it reaches a transaction without a `fulfills` pointer.
/// Multi-input merges are therefore followed through their first input only.
///
/// When several transactions are unspent, the one appearing first in the
/// input is the tip.
pub struct ChainReconstructor;

impl ChainReconstructor {
    /// Best-effort ordering, root first
    ///
    /// Never fails: a batch without a tip comes back in input order and a
    /// walk that leaves the batch stops there. Anomalies are logged;
    /// use [`reconstruct_checked`](Self::reconstruct_checked) to inspect them.
    pub fn reconstruct(transactions: Vec<Transaction>) -> Vec<Transaction> {
        let chain = Self::reconstruct_checked(transactions);
        for warning in chain.warnings() {
            match warning {
                ChainWarning::Malformed { spent } => warn!(
                    transactions = chain.len(),
                    spent = ?spent,
                    "could not sort transactions: {}",
                    warning
                ),
                _ => debug!("chain reconstruction: {}", warning),
            }
        }
        chain.into_transactions()
    }

    /// Ordering plus the list of anomalies met on the way
    pub fn reconstruct_checked(transactions: Vec<Transaction>) -> ReconstructedChain {
        if transactions.len() <= 1 {
            return ReconstructedChain::new(transactions, Vec::new());
        }

        let spent = SpentSet::from_transactions(&transactions);
        let unspent: Vec<usize> = transactions
            .iter()
            .enumerate()
            .filter(|(_, tx)| !spent.contains(tx.id()))
            .map(|(i, _)| i)
            .collect();

        let Some(&tip) = unspent.first() else {
            let warning = ChainWarning::Malformed {
                spent: spent.sorted_ids(),
            };
            return ReconstructedChain::new(transactions, vec![warning]);
        };

        let mut warnings = Vec::new();
        if unspent.len() > 1 {
            warnings.push(ChainWarning::Forked {
                tips: unspent
                    .iter()
                    .map(|&i| transactions[i].id().to_string())
                    .collect(),
            });
        }

        // First occurrence wins for duplicated ids
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(transactions.len());
        for (i, tx) in transactions.iter().enumerate() {
            positions.entry(tx.id()).or_insert(i);
        }

        let mut path = vec![tip];
        let mut visited = HashSet::from([tip]);
        let mut current = tip;
        while let Some(previous_id) = transactions[current].predecessor_id() {
            let Some(&previous) = positions.get(previous_id) else {
                warnings.push(ChainWarning::Truncated {
                    missing: previous_id.to_string(),
                });
                break;
            };
            if !visited.insert(previous) {
                warnings.push(ChainWarning::Cycle {
                    at: previous_id.to_string(),
                });
                break;
            }
            path.push(previous);
            current = previous;
        }

        if path.len() < transactions.len() {
            warnings.push(ChainWarning::Unreached {
                count: transactions.len() - path.len(),
            });
        }

        let mut slots: Vec<Option<Transaction>> = transactions.into_iter().map(Some).collect();
        let ordered = path.iter().rev().filter_map(|&i| slots[i].take()).collect();

        ReconstructedChain::new(ordered, warnings)
    }
}
