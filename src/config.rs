use chrono::{DateTime, NaiveDate, Utc};
use dotenvy::dotenv;
use eyre::Result;
use std::env;
use tracing::warn;

/// Wallet #2 from the original investigation; overridable via TRACE_ADDRESS.
const DEFAULT_ADDRESS: &str =
    "kaspa:qpz2vgvlxhmyhmt22h538pjzmvvd52nuut80y5zulgpvyerlskvvwm7n4uk5a";
const DEFAULT_API_BASE: &str = "https://api.kaspa.org";
const DEFAULT_CUTOFF: &str = "2022-01-01";

/// How raw transactions are turned into flow edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributionMode {
    /// Proportional attribution: each output split across input addresses
    /// by their share of the total input value.
    Weighted,
    /// Unweighted pairing: one row per (input, output) pair carrying the
    /// full output amount.
    Pairs,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub address: String,
    pub api_base: String,
    pub page_limit: u32,
    pub max_pages: u32,
    pub cutoff: DateTime<Utc>,
    pub data_dir: String,
    pub timeout_secs: u64,
    pub mode: AttributionMode,
}

pub fn load() -> Result<Config> {
    dotenv().ok(); // load from .env file if present

    let address = env::var("TRACE_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());

    let api_base = env::var("KASPA_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

    // API page size (default: 500)
    let page_limit = env::var("PAGE_LIMIT")
        .unwrap_or_else(|_| "500".to_string())
        .parse()
        .unwrap_or(500);

    // Safety valve on the backward walk (default: 100000 pages)
    let max_pages = env::var("MAX_PAGES")
        .unwrap_or_else(|_| "100000".to_string())
        .parse()
        .unwrap_or(100_000);

    // History older than this date is not collected
    let cutoff = parse_cutoff(
        &env::var("CUTOFF_DATE").unwrap_or_else(|_| DEFAULT_CUTOFF.to_string()),
    );

    let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "flow_data_fullhistory".to_string());

    let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
        .unwrap_or_else(|_| "30".to_string())
        .parse()
        .unwrap_or(30);

    let mode = match env::var("ATTRIBUTION_MODE")
        .unwrap_or_else(|_| "weighted".to_string())
        .to_lowercase()
        .as_str()
    {
        "pairs" => AttributionMode::Pairs,
        "weighted" => AttributionMode::Weighted,
        other => {
            warn!("Unknown ATTRIBUTION_MODE '{}', using weighted", other);
            AttributionMode::Weighted
        }
    };

    Ok(Config {
        address,
        api_base,
        page_limit,
        max_pages,
        cutoff,
        data_dir,
        timeout_secs,
        mode,
    })
}

fn parse_cutoff(s: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|| {
            warn!("Invalid CUTOFF_DATE '{}', using {}", s, DEFAULT_CUTOFF);
            // the default is a valid date literal
            NaiveDate::from_ymd_opt(2022, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_parses_plain_date() {
        let dt = parse_cutoff("2023-06-15");
        assert_eq!(dt.to_rfc3339(), "2023-06-15T00:00:00+00:00");
    }

    #[test]
    fn bad_cutoff_falls_back_to_default() {
        let dt = parse_cutoff("not-a-date");
        assert_eq!(dt.to_rfc3339(), "2022-01-01T00:00:00+00:00");
    }
}
