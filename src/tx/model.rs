use crate::identity::{KeypairError, Keypair, PublicKey, Signature, SignatureError, Signer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha3::{Digest, Sha3_256};
use std::fmt;
use thiserror::Error;

/// Transaction format version written by the builder
pub const TRANSACTION_VERSION: &str = "2.0";

fn default_version() -> String {
    TRANSACTION_VERSION.to_string()
}

/// Errors raised while preparing, signing or checking a transaction
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Transaction has no outputs")]
    MissingOutputs,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Input {0} has no owner")]
    MissingOwner(usize),

    #[error("Transaction {transaction_id} has no output {index}")]
    MissingOutput { transaction_id: String, index: u32 },

    #[error("Transfer has no asset id to reference")]
    MissingAssetId,

    #[error("Signer mismatch on input {index}: owner is {owner}, signer is {signer}")]
    OwnerMismatch {
        index: usize,
        owner: String,
        signer: String,
    },

    #[error("Input {0} is not fulfilled")]
    Unfulfilled(usize),

    #[error("Invalid fulfillment on input {index}: {reason}")]
    InvalidFulfillment { index: usize, reason: String },

    #[error("Id mismatch: transaction claims {claimed}, content hashes to {computed}")]
    IdMismatch { claimed: String, computed: String },

    #[error("Invalid key: {0}")]
    InvalidKey(#[from] KeypairError),

    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The two kinds of ledger transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Establishes a new asset; the chain root
    Create,
    /// Spends a previous output to reassign the asset
    Transfer,
}

impl Operation {
    /// Wire name (`CREATE` / `TRANSFER`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Asset block: payload on CREATE, back-reference on TRANSFER
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Asset {
    /// Asset carrying a payload (CREATE)
    pub fn with_data(data: Value) -> Self {
        Self {
            id: None,
            data: Some(data),
        }
    }

    /// Asset referencing an existing asset id (TRANSFER)
    pub fn link(asset_id: impl Into<String>) -> Self {
        Self {
            id: Some(asset_id.into()),
            data: None,
        }
    }
}

/// Pointer from an input to the output it consumes
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fulfills {
    pub transaction_id: String,
    #[serde(default)]
    pub output_index: u32,
}

impl Fulfills {
    pub fn new(transaction_id: impl Into<String>, output_index: u32) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            output_index,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Base58 public keys allowed to spend what this input consumes
    #[serde(default)]
    pub owners_before: Vec<String>,
    /// `None` on a CREATE input
    #[serde(default)]
    pub fulfills: Option<Fulfills>,
    /// Hex Ed25519 signature, set when the transaction is signed
    #[serde(default)]
    pub fulfillment: Option<String>,
}

impl Input {
    /// Input of a CREATE transaction (consumes nothing)
    pub fn issuance(owner: &PublicKey) -> Self {
        Self {
            owners_before: vec![owner.to_base58()],
            fulfills: None,
            fulfillment: None,
        }
    }

    /// Input spending `fulfills`, owned by `owners_before`
    pub fn spending(owners_before: Vec<String>, fulfills: Fulfills) -> Self {
        Self {
            owners_before,
            fulfills: Some(fulfills),
            fulfillment: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Base58 public keys of the new owners
    pub public_keys: Vec<String>,
    /// Share count, as a decimal string
    pub amount: String,
}

impl Output {
    /// Single-owner output
    pub fn to(owner: &PublicKey, amount: u64) -> Self {
        Self {
            public_keys: vec![owner.to_base58()],
            amount: amount.to_string(),
        }
    }

    /// Parsed share count, `None` if the wire value is not an integer
    pub fn amount(&self) -> Option<u64> {
        self.amount.parse().ok()
    }
}

/// An unsigned transaction without an id (the result of "prepare")
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    #[serde(default = "default_version")]
    version: String,
    operation: Operation,
    #[serde(default)]
    asset: Asset,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    inputs: Vec<Input>,
    #[serde(default)]
    outputs: Vec<Output>,
}

impl TransactionBody {
    /// Assemble a body from parts
    pub fn new(
        operation: Operation,
        asset: Asset,
        metadata: Option<Value>,
        inputs: Vec<Input>,
        outputs: Vec<Output>,
    ) -> Self {
        Self {
            version: default_version(),
            operation,
            asset,
            metadata,
            inputs,
            outputs,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Compact JSON with object keys sorted
    ///
    /// `serde_json::Value` keeps objects in a `BTreeMap`, so going through it
    /// yields the same bytes for the same content regardless of field order.
    fn canonical_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::to_vec(&value)?)
    }

    /// Bytes every input signature covers: the body with all fulfillments cleared
    pub fn signing_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let mut unsigned = self.clone();
        for input in &mut unsigned.inputs {
            input.fulfillment = None;
        }
        unsigned.canonical_bytes()
    }

    /// Hex SHA3-256 of the canonical body, fulfillments included
    pub fn compute_id(&self) -> Result<String, TransactionError> {
        let bytes = self.canonical_bytes()?;
        Ok(hex::encode(Sha3_256::digest(&bytes)))
    }

    /// Fulfill every input with `keypair` and derive the transaction id
    ///
    /// Each input's first owner must be the signer.
    pub fn sign(mut self, keypair: &Keypair) -> Result<Transaction, TransactionError> {
        let signer = keypair.public_key().to_base58();
        for (index, input) in self.inputs.iter().enumerate() {
            let owner = input
                .owners_before
                .first()
                .ok_or(TransactionError::MissingOwner(index))?;
            if owner != &signer {
                return Err(TransactionError::OwnerMismatch {
                    index,
                    owner: owner.clone(),
                    signer,
                });
            }
        }

        let message = self.signing_bytes()?;
        let fulfillment = Signer::sign(keypair, &message).to_hex();
        for input in &mut self.inputs {
            input.fulfillment = Some(fulfillment.clone());
        }

        let id = self.compute_id()?;
        Ok(Transaction { id, body: self })
    }
}

/// A signed transaction as stored on, and fetched from, the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: String,
    #[serde(flatten)]
    body: TransactionBody,
}

impl Transaction {
    /// Pair an id with a body without recomputing it (e.g. records from a node)
    pub fn from_parts(id: impl Into<String>, body: TransactionBody) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn into_body(self) -> TransactionBody {
        self.body
    }

    pub fn operation(&self) -> Operation {
        self.body.operation
    }

    pub fn asset(&self) -> &Asset {
        &self.body.asset
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.body.metadata.as_ref()
    }

    pub fn inputs(&self) -> &[Input] {
        &self.body.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.body.outputs
    }

    pub fn is_create(&self) -> bool {
        self.body.operation == Operation::Create
    }

    /// The asset this transaction belongs to: its own id for CREATE,
    /// the referenced asset id for TRANSFER
    pub fn asset_id(&self) -> Option<&str> {
        match self.body.operation {
            Operation::Create => Some(&self.id),
            Operation::Transfer => self.body.asset.id.as_deref(),
        }
    }

    /// The transaction whose output the first input consumes
    pub fn predecessor_id(&self) -> Option<&str> {
        self.body
            .inputs
            .first()
            .and_then(|input| input.fulfills.as_ref())
            .map(|f| f.transaction_id.as_str())
    }

    /// Every transaction id this one consumes outputs of, in input order
    pub fn spent_ids(&self) -> impl Iterator<Item = &str> {
        self.body
            .inputs
            .iter()
            .filter_map(|input| input.fulfills.as_ref())
            .map(|f| f.transaction_id.as_str())
    }

    /// Check the id against the content and every fulfillment against its first owner
    pub fn verify(&self) -> Result<(), TransactionError> {
        let computed = self.body.compute_id()?;
        if computed != self.id {
            return Err(TransactionError::IdMismatch {
                claimed: self.id.clone(),
                computed,
            });
        }

        let message = self.body.signing_bytes()?;
        for (index, input) in self.body.inputs.iter().enumerate() {
            let owner = input
                .owners_before
                .first()
                .ok_or(TransactionError::MissingOwner(index))?;
            let fulfillment = input
                .fulfillment
                .as_deref()
                .ok_or(TransactionError::Unfulfilled(index))?;

            let public_key = PublicKey::from_base58(owner)?;
            let signature = Signature::from_hex(fulfillment)?;
            if !Signer::verify(&public_key, &message, &signature) {
                return Err(TransactionError::InvalidFulfillment {
                    index,
                    reason: "signature does not match owner".to_string(),
                });
            }
        }

        Ok(())
    }
}
