// src/tracer.rs
//
// The backward walk over an address's transaction history. Strictly
// sequential: each page must finish before the next cursor can be computed,
// since the cursor is the oldest block time seen so far.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::api::{ApiClient, FetchError, RawTransaction};
use crate::attribution;
use crate::config::{AttributionMode, Config};
use crate::dataset::FlowDataset;

/// Source of history pages. Implemented by [`ApiClient`]; test code supplies
/// scripted pages.
#[async_trait]
pub trait PageSource {
    async fn fetch_page(
        &self,
        address: &str,
        before: i64,
    ) -> Result<Vec<RawTransaction>, FetchError>;
}

#[async_trait]
impl PageSource for ApiClient {
    async fn fetch_page(
        &self,
        address: &str,
        before: i64,
    ) -> Result<Vec<RawTransaction>, FetchError> {
        ApiClient::fetch_page(self, address, before).await
    }
}

/// Walk the history of `cfg.address` backward from now until the cutoff date,
/// the end of history, or the page safety valve, attributing every
/// transaction into flow edges.
///
/// Fetch failures end the walk early; whatever was accumulated up to that
/// point is returned rather than discarded.
pub async fn run<S: PageSource>(cfg: &Config, source: &S) -> FlowDataset {
    let mut dataset = FlowDataset::new();
    let mut before = Utc::now().timestamp_millis();

    for page_no in 1..=cfg.max_pages {
        let page = match source.fetch_page(&cfg.address, before).await {
            Ok(page) => page,
            Err(e) => {
                error!("❌ Error fetching transactions: {}", e);
                break;
            }
        };

        if page.is_empty() {
            info!("✅ No more transactions.");
            break;
        }

        // Cutoff is evaluated per transaction rather than break-on-first, so
        // a page that is not perfectly time-ordered near the boundary still
        // contributes every in-range transaction.
        let mut reached_cutoff = false;
        for tx in &page {
            let timestamp = tx.timestamp();
            if is_before_cutoff(&timestamp, cfg.cutoff) {
                reached_cutoff = true;
                continue;
            }

            let edges = match cfg.mode {
                AttributionMode::Weighted => attribution::attribute(tx, &timestamp),
                AttributionMode::Pairs => attribution::pair_all(tx, &timestamp),
            };
            dataset.extend(edges);
        }

        if reached_cutoff {
            info!("Reached cutoff date on page {}", page_no);
            break;
        }

        // Advance to the oldest block time in the page. An absent block time
        // would leave the cursor unchanged, so treat it as terminal instead
        // of spinning until the page valve trips.
        match page.last().and_then(|tx| tx.block_time) {
            Some(oldest) => before = oldest,
            None => {
                warn!("Oldest transaction in page {} has no block_time, stopping", page_no);
                break;
            }
        }
    }

    dataset
}

/// Cutoff check over the formatted timestamp. Fails open: a timestamp that
/// does not parse is treated as not-before-cutoff.
fn is_before_cutoff(timestamp: &str, cutoff: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&Utc) < cutoff,
        Err(_) => {
            warn!("Timestamp parsing failed: {}", timestamp);
            false
        }
    }
}
