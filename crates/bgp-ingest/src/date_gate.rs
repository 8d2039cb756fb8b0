//! Per-date "already ingested" markers.
//!
//! The first visit to a date runs the creation path for both of its pages;
//! every later visit runs the update path.

use anyhow::{Context, Result};
use bgp_db::DateMarkerStore;
use bgp_reconcile::IngestPath;
use chrono::NaiveDate;

pub struct DateGate<'a, S: DateMarkerStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: DateMarkerStore + ?Sized> DateGate<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn has_been_seen(&self, date: NaiveDate) -> Result<bool> {
        self.store
            .date_marker_exists(date)
            .await
            .with_context(|| format!("date marker lookup failed for {date}"))
    }

    pub async fn mark_seen(&self, date: NaiveDate) -> Result<()> {
        self.store
            .insert_date_marker(date)
            .await
            .with_context(|| format!("date marker insert failed for {date}"))
    }

    /// Check-then-mark. Call once per date visit; the returned path applies
    /// to every snapshot of that visit.
    pub async fn select_path(&self, date: NaiveDate) -> Result<IngestPath> {
        if self.has_been_seen(date).await? {
            return Ok(IngestPath::Update);
        }
        self.mark_seen(date).await?;
        Ok(IngestPath::Creation)
    }
}
