//! Tag generation gives up after the configured number of draws.

use std::time::Duration;

use bgp_ingest::{ColorTagPolicy, GameRegistry, IngestSettings, Ingestor, RegistryError};
use bgp_testkit::{count_cells, MemoryLedgerStore, ScriptedSource};
use chrono::NaiveDate;

/// Exactly one possible tag: rgb(10,10,10).
fn single_tag_policy() -> ColorTagPolicy {
    ColorTagPolicy {
        channel_min: 10,
        channel_max: 10,
        max_attempts: 5,
    }
}

#[tokio::test]
async fn second_game_exhausts_a_single_tag_space() {
    let store = MemoryLedgerStore::new();
    let mut registry = GameRegistry::new(&store, single_tag_policy());

    let azul = registry.resolve("Azul").await.unwrap();
    assert!(azul.created);
    assert_eq!(store.game("Azul").unwrap().color_tag, "rgb(10,10,10)");

    let err = registry.resolve("Catan").await.unwrap_err();
    assert!(
        matches!(err, RegistryError::TagSpaceExhausted { attempts: 5 }),
        "{err}"
    );
    assert!(store.game("Catan").is_none());

    // Known names still resolve.
    assert!(!registry.resolve("Azul").await.unwrap().created);
}

#[tokio::test]
async fn exhaustion_aborts_the_ingest_run() {
    let day = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
    let store = MemoryLedgerStore::new();
    let source = ScriptedSource::new();
    source.set_page(day, 1, count_cells(&[("Azul", 1), ("Catan", 2)]));
    source.set_page(day, 2, count_cells(&[]));

    let settings = IngestSettings {
        pacing: Duration::ZERO,
        tag_policy: single_tag_policy(),
    };
    let err = Ingestor::new(&store, &source, settings)
        .ingest_until(NaiveDate::from_ymd_opt(2024, 10, 2).unwrap(), 1)
        .await
        .unwrap_err();

    let exhausted = err
        .chain()
        .any(|e| matches!(e.downcast_ref::<RegistryError>(), Some(RegistryError::TagSpaceExhausted { .. })));
    assert!(exhausted, "{err:#}");

    // Azul was written before the failure and stays committed.
    assert_eq!(store.record(day, "Azul").unwrap().play_count, 1);
}
