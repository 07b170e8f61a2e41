//! Client-side helpers for an asset ledger.
//!
//! - [`identity`]: Ed25519 keys and signatures
//! - [`tx`]: transaction model, preparation, signing, JSON codec
//! - [`chain`]: ordering an asset's transactions from CREATE to tip
//! - [`client`]: ledger node access and the [`client::Connection`] façade

pub mod chain;
pub mod client;
pub mod identity;
pub mod tx;

pub use chain::{ChainReconstructor, ChainWarning, ReconstructedChain};
pub use client::{Connection, ConnectionConfig, ConnectionError, LedgerClient};
pub use tx::{Operation, Transaction, TransactionBody, TransactionBuilder};
