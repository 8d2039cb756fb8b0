use std::collections::BTreeMap;
use std::sync::Mutex;

use bgp_source::{ObservationSource, SourceError};
use chrono::NaiveDate;

/// Canned pages keyed by (date, page). Every fetch is recorded in call order.
/// Unscripted pages come back as a structural failure.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pages: Mutex<BTreeMap<(NaiveDate, u32), Result<Vec<String>, SourceError>>>,
    calls: Mutex<Vec<(NaiveDate, u32)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script (or re-script) a page.
    pub fn set_page(&self, date: NaiveDate, page: u32, cells: Vec<String>) {
        self.pages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert((date, page), Ok(cells));
    }

    pub fn set_failure(&self, date: NaiveDate, page: u32, err: SourceError) {
        self.pages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert((date, page), Err(err));
    }

    pub fn calls(&self) -> Vec<(NaiveDate, u32)> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl ObservationSource for ScriptedSource {
    fn source_name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_snapshot(&self, date: NaiveDate, page: u32) -> Result<Vec<String>, SourceError> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((date, page));
        self.pages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&(date, page))
            .cloned()
            .unwrap_or_else(|| {
                Err(SourceError::Structure(format!(
                    "no scripted page for {date} page {page}"
                )))
            })
    }
}
