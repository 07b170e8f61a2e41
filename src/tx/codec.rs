use crate::tx::Transaction;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to encode transaction: {0}")]
    EncodeError(String),

    #[error("Failed to decode transaction: {0}")]
    DecodeError(String),

    #[error("Failed to read {path}: {reason}")]
    ReadError { path: String, reason: String },
}

/// JSON codec for ledger transactions
pub struct TransactionCodec;

impl TransactionCodec {
    /// Encode a transaction to compact JSON
    pub fn encode(tx: &Transaction) -> Result<String, CodecError> {
        serde_json::to_string(tx).map_err(|e| CodecError::EncodeError(e.to_string()))
    }

    /// Encode a transaction to indented JSON
    pub fn encode_pretty(tx: &Transaction) -> Result<String, CodecError> {
        serde_json::to_string_pretty(tx).map_err(|e| CodecError::EncodeError(e.to_string()))
    }

    /// Decode a single transaction
    pub fn decode(json: &str) -> Result<Transaction, CodecError> {
        serde_json::from_str(json).map_err(|e| CodecError::DecodeError(e.to_string()))
    }

    /// Decode a JSON array of transactions, keeping the array order
    pub fn decode_list(json: &str) -> Result<Vec<Transaction>, CodecError> {
        serde_json::from_str(json).map_err(|e| CodecError::DecodeError(e.to_string()))
    }

    /// Read a JSON array of transactions from a file
    pub fn read_list<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>, CodecError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| CodecError::ReadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::decode_list(&json)
    }
}
