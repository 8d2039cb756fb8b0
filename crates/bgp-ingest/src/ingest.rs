//! Window scan: fetch both pages of each date, oldest first, and reconcile.

use std::time::Duration;

use anyhow::{Context, Result};
use bgp_db::LedgerStore;
use bgp_reconcile::{snapshot_from_cells, IngestPath, Snapshot};
use bgp_source::ObservationSource;
use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use crate::date_gate::DateGate;
use crate::engine::ReconciliationEngine;
use crate::registry::{ColorTagPolicy, GameRegistry};
use crate::summary::{FailedDate, IngestSummary};

/// Pages read per date, in this order.
pub const PAGES_PER_DATE: u32 = 2;
pub const DEFAULT_PACING: Duration = Duration::from_secs(5);

/// Dates `today - window_days ..= today - 1`, oldest first.
pub fn scan_window(today: NaiveDate, window_days: u32) -> Vec<NaiveDate> {
    (1..=u64::from(window_days))
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Fixed delay between consecutive upstream fetches. The first fetch of a
/// run goes out immediately.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    fetches: u64,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, fetches: 0 }
    }

    pub async fn before_fetch(&mut self) {
        if self.fetches > 0 && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.fetches += 1;
    }

    pub fn fetches(&self) -> u64 {
        self.fetches
    }
}

#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub pacing: Duration,
    pub tag_policy: ColorTagPolicy,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_PACING,
            tag_policy: ColorTagPolicy::default(),
        }
    }
}

pub struct Ingestor<'a, S: LedgerStore + ?Sized, Src: ObservationSource + ?Sized> {
    store: &'a S,
    source: &'a Src,
    settings: IngestSettings,
    tag_rng: Option<StdRng>,
}

impl<'a, S: LedgerStore + ?Sized, Src: ObservationSource + ?Sized> Ingestor<'a, S, Src> {
    pub fn new(store: &'a S, source: &'a Src, settings: IngestSettings) -> Self {
        Self {
            store,
            source,
            settings,
            tag_rng: None,
        }
    }

    /// Seed colour-tag draws (tests).
    pub fn with_tag_rng(mut self, rng: StdRng) -> Self {
        self.tag_rng = Some(rng);
        self
    }

    /// Scan the `window_days` days before today (local time).
    pub async fn ingest(&mut self, window_days: u32) -> Result<IngestSummary> {
        let today = Local::now().date_naive();
        self.ingest_until(today, window_days).await
    }

    /// Scan the `window_days` days before `today`.
    ///
    /// A date whose pages cannot be fetched or read is logged, recorded in
    /// the summary and left unmarked; the scan moves on. Store failures end
    /// the run with an error.
    pub async fn ingest_until(&mut self, today: NaiveDate, window_days: u32) -> Result<IngestSummary> {
        let dates = scan_window(today, window_days);
        let mut summary = IngestSummary {
            window_start: dates.first().copied(),
            window_end: dates.last().copied(),
            ..IngestSummary::default()
        };
        info!(
            source = self.source.source_name(),
            window_days,
            start = ?summary.window_start,
            end = ?summary.window_end,
            "ingest run starting"
        );

        let registry = match self.tag_rng.take() {
            Some(rng) => GameRegistry::with_rng(self.store, self.settings.tag_policy, rng),
            None => GameRegistry::new(self.store, self.settings.tag_policy),
        };
        let mut engine = ReconciliationEngine::new(self.store, registry);
        let gate = DateGate::new(self.store);
        let mut pacer = Pacer::new(self.settings.pacing);

        for date in dates {
            summary.dates_scanned += 1;

            let snapshots = match self.fetch_date(&mut pacer, date).await {
                Ok(s) => s,
                Err(failure) => {
                    warn!(%date, page = failure.page, reason = %failure.reason, "date skipped");
                    summary.failures.push(failure);
                    continue;
                }
            };

            let path = gate.select_path(date).await.map_err(|e| {
                error!(%date, error = ?e, "store failure; aborting run");
                e
            })?;
            match path {
                IngestPath::Creation => summary.creation_passes += 1,
                IngestPath::Update => summary.update_passes += 1,
            }

            for (idx, snapshot) in snapshots.iter().enumerate() {
                let report = engine
                    .apply_snapshot(date, path, snapshot)
                    .await
                    .map_err(|e| {
                        error!(%date, page = idx + 1, error = ?e, "reconciliation failed; aborting run");
                        e
                    })
                    .with_context(|| format!("reconcile {date} page {}", idx + 1))?;
                summary.absorb(&report);
            }

            summary.dates_ingested += 1;
            info!(
                %date,
                path = path.as_str(),
                observations = snapshots.iter().map(|s| s.observations.len()).sum::<usize>(),
                "date ingested"
            );
        }

        summary.total_games = self.store.count_games().await.context("count games")?;
        summary.total_play_records = self
            .store
            .count_play_records()
            .await
            .context("count play records")?;

        info!(
            dates_ingested = summary.dates_ingested,
            dates_failed = summary.dates_failed(),
            games_created = summary.games_created,
            total_games = summary.total_games,
            total_play_records = summary.total_play_records,
            "ingest run complete"
        );
        Ok(summary)
    }

    /// Both pages, in order. The first failure wins; the second page is not
    /// fetched after a failed first page.
    async fn fetch_date(&self, pacer: &mut Pacer, date: NaiveDate) -> Result<Vec<Snapshot>, FailedDate> {
        let mut snapshots = Vec::with_capacity(PAGES_PER_DATE as usize);
        for page in 1..=PAGES_PER_DATE {
            pacer.before_fetch().await;
            let failed = |reason: String| FailedDate { date, page, reason };

            let cells = self
                .source
                .fetch_snapshot(date, page)
                .await
                .map_err(|e| failed(e.to_string()))?;
            let snapshot = snapshot_from_cells(cells.as_slice()).map_err(|e| failed(e.to_string()))?;
            snapshots.push(snapshot);
        }
        Ok(snapshots)
    }
}
