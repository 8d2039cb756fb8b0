//! bgp-source
//!
//! Upstream leaderboard fetching.
//!
//! This crate owns the source abstraction and the BoardGameGeek "plays by
//! game" fetcher. It does **not** interpret cells or write to the store;
//! callers hand the cells to `bgp-reconcile` and the ingestion engine.

pub mod html;
pub mod provider;

pub use html::extract_table_cells;
pub use provider::{ObservationSource, SourceError};

use chrono::NaiveDate;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://boardgamegeek.com";

const USER_AGENT: &str = concat!("bgp-ingest/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// BoardGameGeek-backed snapshot source.
#[derive(Debug, Clone)]
pub struct BggPlaysSource {
    http: reqwest::Client,
    base_url: String,
}

impl BggPlaysSource {
    pub fn new() -> Result<Self, SourceError> {
        Self::new_with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn new_with_base_url(base_url: String) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Config(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/plays/bygame/subtype/All/start/{date}/end/{date}/page/{page}`
    pub fn build_page_url(&self, date: NaiveDate, page: u32) -> String {
        let d = date.format("%Y-%m-%d");
        format!(
            "{}/plays/bygame/subtype/All/start/{d}/end/{d}/page/{page}",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl ObservationSource for BggPlaysSource {
    fn source_name(&self) -> &'static str {
        "bgg"
    }

    async fn fetch_snapshot(&self, date: NaiveDate, page: u32) -> Result<Vec<String>, SourceError> {
        let url = self.build_page_url(date, page);
        debug!(%date, page, %url, "fetching leaderboard page");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::Decode(format!("response body read failed: {e}")))?;

        extract_table_cells(&body)
    }
}

// -----------------
// Tests (no network)
// -----------------
