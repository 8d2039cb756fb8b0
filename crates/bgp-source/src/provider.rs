//! Source boundary for leaderboard snapshots.
//!
//! This module defines **only** the source trait and its error type.
//! No concrete fetchers, no store logic, and no reconciliation belong here.

use chrono::NaiveDate;
use std::fmt;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that an [`ObservationSource`] implementation may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network or transport failure.
    Transport(String),
    /// The upstream site answered with a non-success status.
    Http { status: u16 },
    /// The page does not contain the expected table.
    Structure(String),
    /// A response body could not be decoded.
    Decode(String),
    /// The source itself is misconfigured (bad base URL, client build failure).
    Config(String),
}

impl SourceError {
    /// Failures that say something about the page shape rather than the network.
    pub fn is_structural(&self) -> bool {
        matches!(self, SourceError::Structure(_))
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Transport(msg) => write!(f, "transport error: {msg}"),
            SourceError::Http { status } => write!(f, "upstream http error status={status}"),
            SourceError::Structure(msg) => write!(f, "unexpected page structure: {msg}"),
            SourceError::Decode(msg) => write!(f, "decode error: {msg}"),
            SourceError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Upstream leaderboard contract.
///
/// One call returns one page of the "plays by game" table for a single date
/// as a flat list of stripped, non-empty text cells in document order.
/// Interpreting those cells is the caller's job.
#[async_trait::async_trait]
pub trait ObservationSource: Send + Sync {
    /// Human-readable name identifying this source (e.g. `"bgg"`).
    fn source_name(&self) -> &'static str;

    async fn fetch_snapshot(&self, date: NaiveDate, page: u32) -> Result<Vec<String>, SourceError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_display_http() {
        let err = SourceError::Http { status: 503 };
        assert_eq!(err.to_string(), "upstream http error status=503");
    }

    #[test]
    fn source_error_display_structure() {
        let err = SourceError::Structure("missing table".to_string());
        assert_eq!(err.to_string(), "unexpected page structure: missing table");
        assert!(err.is_structural());
        assert!(!SourceError::Transport("x".to_string()).is_structural());
    }

    #[test]
    fn source_is_object_safe_via_box() {
        struct Empty;

        #[async_trait::async_trait]
        impl ObservationSource for Empty {
            fn source_name(&self) -> &'static str {
                "empty"
            }

            async fn fetch_snapshot(
                &self,
                _date: NaiveDate,
                _page: u32,
            ) -> Result<Vec<String>, SourceError> {
                Ok(Vec::new())
            }
        }

        let _s: Box<dyn ObservationSource> = Box::new(Empty);
    }
}
