//! No two games ever share a colour tag, even when the tag space is small
//! enough that draws collide often.

use std::collections::BTreeSet;

use bgp_ingest::{ColorTagPolicy, GameRegistry};
use bgp_testkit::MemoryLedgerStore;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn channels(tag: &str) -> Vec<u8> {
    tag.trim_start_matches("rgb(")
        .trim_end_matches(')')
        .split(',')
        .map(|c| c.parse().unwrap())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn tags_are_unique_per_game(
        names in prop::collection::btree_set("[A-Za-z][A-Za-z ]{0,11}", 1..100),
        seed in any::<u64>(),
    ) {
        // 5^3 = 125 possible tags.
        let policy = ColorTagPolicy { channel_min: 10, channel_max: 14, max_attempts: 100_000 };
        let store = MemoryLedgerStore::new();

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            let mut registry = GameRegistry::with_rng(&store, policy, StdRng::seed_from_u64(seed));
            for name in &names {
                let first = registry.resolve(name).await.unwrap();
                let again = registry.resolve(name).await.unwrap();
                assert!(first.created);
                assert!(!again.created);
                assert_eq!(first.game_id, again.game_id);
            }
        });

        let games = store.games();
        prop_assert_eq!(games.len(), names.len());

        let tags: BTreeSet<String> = games.iter().map(|g| g.color_tag.clone()).collect();
        prop_assert_eq!(tags.len(), games.len());
        prop_assert_eq!(store.claimed_tags(), games.len());

        for tag in &tags {
            let ch = channels(tag);
            prop_assert_eq!(ch.len(), 3);
            prop_assert!(ch.iter().all(|c| (10..=14).contains(c)), "{}", tag);
        }
    }
}

#[tokio::test]
async fn default_policy_tags_stay_within_legible_range() {
    let store = MemoryLedgerStore::new();
    let mut registry =
        GameRegistry::with_rng(&store, ColorTagPolicy::default(), StdRng::seed_from_u64(42));
    for i in 0..500 {
        registry.resolve(&format!("Game {i}")).await.unwrap();
    }

    let games = store.games();
    let tags: BTreeSet<&str> = games.iter().map(|g| g.color_tag.as_str()).collect();
    assert_eq!(tags.len(), 500);
    for tag in tags {
        assert!(tag.starts_with("rgb("), "{tag}");
        assert!(channels(tag).iter().all(|c| (10..=240).contains(c)), "{tag}");
    }
}
