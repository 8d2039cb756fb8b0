use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::PassReport;

/// A date that could not be fetched or read. It was not marked seen, so the
/// next run visits it again on the creation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDate {
    pub date: NaiveDate,
    pub page: u32,
    pub reason: String,
}

/// End-of-run report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub window_start: Option<NaiveDate>,
    pub window_end: Option<NaiveDate>,
    pub dates_scanned: u32,
    pub dates_ingested: u32,
    pub creation_passes: u32,
    pub update_passes: u32,
    pub observations: u64,
    pub inserted: u64,
    pub incremented: u64,
    pub overwritten: u64,
    pub unchanged: u64,
    pub games_created: u64,
    pub skipped_cells: u64,
    pub failures: Vec<FailedDate>,
    pub total_games: i64,
    pub total_play_records: i64,
}

impl IngestSummary {
    pub fn dates_failed(&self) -> u32 {
        self.failures.len() as u32
    }

    pub(crate) fn absorb(&mut self, report: &PassReport) {
        self.observations += report.observations;
        self.inserted += report.inserted;
        self.incremented += report.incremented;
        self.overwritten += report.overwritten;
        self.unchanged += report.unchanged;
        self.games_created += report.games_created;
        self.skipped_cells += report.skipped_cells;
    }

    /// Flat `key=value` pairs, in a stable order, for CLI output.
    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        let date_or_none = |d: Option<NaiveDate>| d.map_or_else(|| "none".to_string(), |d| d.to_string());
        vec![
            ("window_start", date_or_none(self.window_start)),
            ("window_end", date_or_none(self.window_end)),
            ("dates_scanned", self.dates_scanned.to_string()),
            ("dates_ingested", self.dates_ingested.to_string()),
            ("dates_failed", self.dates_failed().to_string()),
            ("creation_passes", self.creation_passes.to_string()),
            ("update_passes", self.update_passes.to_string()),
            ("observations", self.observations.to_string()),
            ("inserted", self.inserted.to_string()),
            ("incremented", self.incremented.to_string()),
            ("overwritten", self.overwritten.to_string()),
            ("unchanged", self.unchanged.to_string()),
            ("games_created", self.games_created.to_string()),
            ("skipped_cells", self.skipped_cells.to_string()),
            ("total_games", self.total_games.to_string()),
            ("total_play_records", self.total_play_records.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_accumulates_pass_counts() {
        let mut s = IngestSummary::default();
        let r = PassReport {
            observations: 3,
            inserted: 2,
            incremented: 1,
            games_created: 2,
            skipped_cells: 1,
            ..PassReport::default()
        };
        s.absorb(&r);
        s.absorb(&r);
        assert_eq!(s.observations, 6);
        assert_eq!(s.inserted, 4);
        assert_eq!(s.incremented, 2);
        assert_eq!(s.games_created, 4);
        assert_eq!(s.skipped_cells, 2);
    }

    #[test]
    fn key_values_include_failures_and_totals() {
        let s = IngestSummary {
            failures: vec![FailedDate {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                page: 2,
                reason: "upstream http error status=503".to_string(),
            }],
            total_games: 9,
            ..IngestSummary::default()
        };
        let kv = s.key_values();
        assert!(kv.contains(&("dates_failed", "1".to_string())));
        assert!(kv.contains(&("total_games", "9".to_string())));
        assert!(kv.contains(&("window_start", "none".to_string())));
    }
}
