//! Re-scrapes of an `Unmerged` record: a larger count replaces the stored
//! one, an equal or smaller count is ignored.

use std::time::Duration;

use bgp_ingest::{IngestSettings, IngestSummary, Ingestor};
use bgp_reconcile::MergeState;
use bgp_testkit::{count_cells, MemoryLedgerStore, ScriptedSource};
use chrono::NaiveDate;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

async fn run(store: &MemoryLedgerStore, source: &ScriptedSource) -> IngestSummary {
    let settings = IngestSettings {
        pacing: Duration::ZERO,
        ..IngestSettings::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
    Ingestor::new(store, source, settings)
        .ingest_until(today, 1)
        .await
        .unwrap()
}

#[tokio::test]
async fn unmerged_record_tracks_larger_counts_and_ignores_stale_ones() {
    let store = MemoryLedgerStore::new();
    let source = ScriptedSource::new();
    source.set_page(day(), 1, count_cells(&[("Azul", 10)]));
    source.set_page(day(), 2, count_cells(&[]));

    let first = run(&store, &source).await;
    assert_eq!(first.creation_passes, 1);
    let rec = store.record(day(), "Azul").unwrap();
    assert_eq!((rec.play_count, rec.merge_state), (10, MergeState::Unmerged));

    // Smaller: unchanged.
    source.set_page(day(), 1, count_cells(&[("Azul", 8)]));
    let second = run(&store, &source).await;
    assert_eq!(second.update_passes, 1);
    assert_eq!(second.unchanged, 1);
    let rec = store.record(day(), "Azul").unwrap();
    assert_eq!((rec.play_count, rec.merge_state), (10, MergeState::Unmerged));

    // Equal: unchanged.
    source.set_page(day(), 1, count_cells(&[("Azul", 10)]));
    run(&store, &source).await;
    assert_eq!(store.record(day(), "Azul").unwrap().play_count, 10);

    // Larger: overwritten, still unmerged.
    source.set_page(day(), 1, count_cells(&[("Azul", 15)]));
    let fourth = run(&store, &source).await;
    assert_eq!(fourth.overwritten, 1);
    let rec = store.record(day(), "Azul").unwrap();
    assert_eq!((rec.play_count, rec.merge_state), (15, MergeState::Unmerged));

    assert_eq!(fourth.total_play_records, 1);
}
