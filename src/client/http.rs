// HTTP implementation of LedgerClient against a node's /api/v1 surface

use super::{AssetRecord, Block, LedgerClient, LedgerError, OutputRef, TxStatus, Vote};
use crate::tx::{Operation, Transaction};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

const API_PREFIX: &str = "/api/v1";

/// Ledger client speaking the node's JSON HTTP API
#[derive(Clone, Debug)]
pub struct HttpLedgerClient {
    base_url: String,
    client: Client,
    headers: HeaderMap,
}

impl HttpLedgerClient {
    /// Create a new client
    pub fn new(node_url: impl Into<String>) -> Self {
        Self::with_client(node_url, Client::new())
    }

    /// Create a client with custom reqwest client
    pub fn with_client(node_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: node_url.into().trim_end_matches('/').to_string(),
            client,
            headers: HeaderMap::new(),
        }
    }

    /// Send `headers` with every request (e.g. app id / key pairs)
    pub fn with_headers(mut self, headers: &HashMap<String, String>) -> Result<Self, LedgerError> {
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                LedgerError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| LedgerError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            self.headers.insert(header_name, header_value);
        }
        Ok(self)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, API_PREFIX, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).headers(self.headers.clone())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, LedgerError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(%status, what, "ledger response");

        if status == StatusCode::NOT_FOUND {
            return Err(LedgerError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, LedgerError> {
        let request = self.get(&format!("transactions/{}", transaction_id));
        self.fetch(request, transaction_id).await
    }

    async fn list_transactions(
        &self,
        asset_id: &str,
        operation: Option<Operation>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let mut query = vec![("asset_id", asset_id.to_string())];
        if let Some(operation) = operation {
            query.push(("operation", operation.as_str().to_string()));
        }
        let request = self.get("transactions").query(&query);
        self.fetch(request, asset_id).await
    }

    async fn list_outputs(
        &self,
        public_key: &str,
        spent: Option<bool>,
    ) -> Result<Vec<OutputRef>, LedgerError> {
        let mut query = vec![("public_key", public_key.to_string())];
        if let Some(spent) = spent {
            query.push(("spent", spent.to_string()));
        }
        let request = self.get("outputs").query(&query);
        self.fetch(request, public_key).await
    }

    async fn get_block(&self, block_id: &str) -> Result<Block, LedgerError> {
        let request = self.get(&format!("blocks/{}", block_id));
        self.fetch(request, block_id).await
    }

    async fn list_blocks(&self, transaction_id: &str) -> Result<Vec<String>, LedgerError> {
        let request = self
            .get("blocks")
            .query(&[("transaction_id", transaction_id)]);
        self.fetch(request, transaction_id).await
    }

    async fn list_votes(&self, block_id: &str) -> Result<Vec<Vote>, LedgerError> {
        let request = self.get("votes").query(&[("block_id", block_id)]);
        self.fetch(request, block_id).await
    }

    async fn search_assets(&self, text: &str) -> Result<Vec<AssetRecord>, LedgerError> {
        let request = self.get("assets").query(&[("search", text)]);
        self.fetch(request, text).await
    }

    async fn post_transaction(&self, transaction: &Transaction) -> Result<(), LedgerError> {
        let response = self
            .client
            .post(self.url("transactions"))
            .headers(self.headers.clone())
            .json(transaction)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn get_status(&self, transaction_id: &str) -> Result<TxStatus, LedgerError> {
        let request = self
            .get("statuses")
            .query(&[("transaction_id", transaction_id)]);
        let response: StatusResponse = self.fetch(request, transaction_id).await?;
        Ok(response.status)
    }
}

#[derive(Deserialize)]
struct StatusResponse {
    status: TxStatus,
}
