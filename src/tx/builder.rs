use crate::identity::PublicKey;
use crate::tx::{Asset, Fulfills, Input, Operation, Output, Transaction, TransactionBody, TransactionError};
use serde_json::Value;

enum Source<'a> {
    Issue { issuer: Option<&'a PublicKey>, data: Option<Value> },
    Spend { previous: &'a Transaction, output_index: u32 },
}

/// Builder for unsigned CREATE and TRANSFER transactions
///
/// ```ignore
/// let body = TransactionBuilder::create()
///     .issuer(&alice.public_key())
///     .asset_data(json!({ "serial": 7 }))
///     .output(&alice.public_key(), 1)
///     .build()?;
/// let tx = body.sign(&alice)?;
/// ```
pub struct TransactionBuilder<'a> {
    source: Source<'a>,
    metadata: Option<Value>,
    outputs: Vec<Output>,
}

impl<'a> TransactionBuilder<'a> {
    /// Start a CREATE transaction
    pub fn create() -> Self {
        Self {
            source: Source::Issue {
                issuer: None,
                data: None,
            },
            metadata: None,
            outputs: Vec::new(),
        }
    }

    /// Start a TRANSFER spending `output_index` of `previous`
    pub fn transfer(previous: &'a Transaction, output_index: u32) -> Self {
        Self {
            source: Source::Spend {
                previous,
                output_index,
            },
            metadata: None,
            outputs: Vec::new(),
        }
    }

    /// Set the issuer who signs a CREATE (required for CREATE, ignored for TRANSFER)
    pub fn issuer(mut self, public_key: &'a PublicKey) -> Self {
        if let Source::Issue { issuer, .. } = &mut self.source {
            *issuer = Some(public_key);
        }
        self
    }

    /// Set the asset payload (CREATE only)
    pub fn asset_data(mut self, payload: Value) -> Self {
        if let Source::Issue { data, .. } = &mut self.source {
            *data = Some(payload);
        }
        self
    }

    /// Attach free-form metadata
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Add a single-owner output
    pub fn output(mut self, owner: &PublicKey, amount: u64) -> Self {
        self.outputs.push(Output::to(owner, amount));
        self
    }

    /// Validate and assemble the unsigned body
    pub fn build(self) -> Result<TransactionBody, TransactionError> {
        if self.outputs.is_empty() {
            return Err(TransactionError::MissingOutputs);
        }
        if self.outputs.iter().any(|o| o.amount() == Some(0)) {
            return Err(TransactionError::InvalidAmount(
                "amount cannot be zero".to_string(),
            ));
        }

        match self.source {
            Source::Issue { issuer, data } => {
                let issuer = issuer.ok_or(TransactionError::MissingOwner(0))?;
                Ok(TransactionBody::new(
                    Operation::Create,
                    data.map(Asset::with_data).unwrap_or_default(),
                    self.metadata,
                    vec![Input::issuance(issuer)],
                    self.outputs,
                ))
            }
            Source::Spend {
                previous,
                output_index,
            } => {
                let spent = previous
                    .outputs()
                    .get(output_index as usize)
                    .ok_or_else(|| TransactionError::MissingOutput {
                        transaction_id: previous.id().to_string(),
                        index: output_index,
                    })?;
                let asset_id = previous
                    .asset_id()
                    .ok_or(TransactionError::MissingAssetId)?;

                let input = Input::spending(
                    spent.public_keys.clone(),
                    Fulfills::new(previous.id(), output_index),
                );

                Ok(TransactionBody::new(
                    Operation::Transfer,
                    Asset::link(asset_id),
                    self.metadata,
                    vec![input],
                    self.outputs,
                ))
            }
        }
    }
}
