// src/api.rs
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

/// Sentinel for addresses the API could not resolve.
pub const UNKNOWN_ADDRESS: &str = "UNKNOWN";

/// One entry of a `full-transactions-page` response. All fields are optional
/// on the wire; defaults (zero amounts, UNKNOWN addresses) are applied here at
/// the parse boundary and nowhere else.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(alias = "txId")]
    pub transaction_id: Option<String>,
    pub block_time: Option<i64>, // ms epoch
    pub inputs: Option<Vec<TxInput>>,
    pub outputs: Option<Vec<TxOutput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxInput {
    pub previous_outpoint_address: Option<String>,
    pub previous_outpoint_amount: Option<u64>, // sompi
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxOutput {
    pub script_public_key_address: Option<String>,
    pub amount: Option<u64>, // sompi
}

impl RawTransaction {
    pub fn id(&self) -> &str {
        self.transaction_id.as_deref().unwrap_or(UNKNOWN_ADDRESS)
    }

    pub fn inputs(&self) -> &[TxInput] {
        self.inputs.as_deref().unwrap_or(&[])
    }

    pub fn outputs(&self) -> &[TxOutput] {
        self.outputs.as_deref().unwrap_or(&[])
    }

    /// Block time as RFC 3339 UTC; an absent block time formats as the epoch.
    pub fn timestamp(&self) -> String {
        format_timestamp(self.block_time.unwrap_or(0))
    }
}

impl TxInput {
    pub fn source_address(&self) -> &str {
        self.previous_outpoint_address
            .as_deref()
            .unwrap_or(UNKNOWN_ADDRESS)
    }

    pub fn amount_sompi(&self) -> u64 {
        self.previous_outpoint_amount.unwrap_or(0)
    }
}

impl TxOutput {
    pub fn recipient_address(&self) -> &str {
        self.script_public_key_address
            .as_deref()
            .unwrap_or(UNKNOWN_ADDRESS)
    }

    pub fn amount_sompi(&self) -> u64 {
        self.amount.unwrap_or(0)
    }
}

pub fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339()
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned HTTP {0}")]
    Status(StatusCode),
}

/// HTTP client for the Kaspa REST API's paginated address history endpoint.
pub struct ApiClient {
    client: Client,
    base: String,
    page_limit: u32,
}

impl ApiClient {
    pub fn new(cfg: &Config) -> eyre::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base: cfg.api_base.trim_end_matches('/').to_string(),
            page_limit: cfg.page_limit,
        })
    }

    /// Fetch one page of accepted transactions strictly older than `before`
    /// (ms epoch), newest first, with previous outpoints resolved inline.
    /// An empty page means history is exhausted.
    pub async fn fetch_page(
        &self,
        address: &str,
        before: i64,
    ) -> Result<Vec<RawTransaction>, FetchError> {
        let url = format!(
            "{}/addresses/{}/full-transactions-page\
             ?limit={}&before={}&resolve_previous_outpoints=full&acceptance=accepted",
            self.base, address, self.page_limit, before
        );

        info!("📦 Fetching before={} for {}", before, address);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let body: Value = resp.json().await?;
        Ok(parse_page(body))
    }
}

/// Decode a page body. A non-array body counts as end of history; malformed
/// entries are skipped individually rather than failing the page.
pub fn parse_page(body: Value) -> Vec<RawTransaction> {
    let Value::Array(entries) = body else {
        warn!("Expected a transaction list, got: {}", body);
        return Vec::new();
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawTransaction>(entry) {
            Ok(tx) => Some(tx),
            Err(e) => {
                warn!("⚠️ Skipping malformed transaction entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_parses_with_defaults() {
        let tx: RawTransaction = serde_json::from_value(json!({})).unwrap();
        assert_eq!(tx.id(), UNKNOWN_ADDRESS);
        assert!(tx.inputs().is_empty());
        assert!(tx.outputs().is_empty());
        assert_eq!(tx.timestamp(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn null_fields_default_like_missing_ones() {
        let tx: RawTransaction = serde_json::from_value(json!({
            "transaction_id": null,
            "block_time": null,
            "inputs": null,
            "outputs": [{"script_public_key_address": null, "amount": null}],
        }))
        .unwrap();
        assert_eq!(tx.id(), UNKNOWN_ADDRESS);
        assert_eq!(tx.outputs().len(), 1);
        assert_eq!(tx.outputs()[0].recipient_address(), UNKNOWN_ADDRESS);
        assert_eq!(tx.outputs()[0].amount_sompi(), 0);
    }

    #[test]
    fn tx_id_alias_is_accepted() {
        let tx: RawTransaction = serde_json::from_value(json!({"txId": "abc"})).unwrap();
        assert_eq!(tx.id(), "abc");
    }

    #[test]
    fn block_time_formats_as_utc_rfc3339() {
        let tx: RawTransaction =
            serde_json::from_value(json!({"block_time": 1_655_000_000_000i64})).unwrap();
        assert_eq!(tx.timestamp(), "2022-06-12T02:13:20+00:00");
    }

    #[test]
    fn malformed_entries_are_skipped_individually() {
        let page = parse_page(json!([
            {"transaction_id": "a", "block_time": 1000},
            "not-a-transaction",
            42,
            {"transaction_id": "b"},
        ]));
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id(), "a");
        assert_eq!(page[1].id(), "b");
    }

    #[test]
    fn non_array_body_is_end_of_history() {
        assert!(parse_page(json!({"error": "nope"})).is_empty());
        assert!(parse_page(json!(null)).is_empty());
    }
}
