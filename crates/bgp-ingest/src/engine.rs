//! Applies reconciliation decisions to the ledger store.

use anyhow::{anyhow, Context, Result};
use bgp_db::{LedgerStore, PlayDelta, PlayKey, PlayRecordRow};
use bgp_reconcile::{plan, IngestPath, Observation, PlayMutation, PlayTotals, Snapshot};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::registry::GameRegistry;

/// Counts for one snapshot applied to one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub observations: u64,
    pub inserted: u64,
    pub incremented: u64,
    pub overwritten: u64,
    pub unchanged: u64,
    pub games_created: u64,
    pub skipped_cells: u64,
}

impl PassReport {
    fn record(&mut self, mutation: &PlayMutation) {
        self.observations += 1;
        match mutation {
            PlayMutation::Insert { .. } => self.inserted += 1,
            PlayMutation::Increment { .. } => self.incremented += 1,
            PlayMutation::Overwrite { .. } => self.overwritten += 1,
            PlayMutation::Unchanged => self.unchanged += 1,
        }
    }
}

pub struct ReconciliationEngine<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    registry: GameRegistry<'a, S>,
}

impl<'a, S: LedgerStore + ?Sized> ReconciliationEngine<'a, S> {
    pub fn new(store: &'a S, registry: GameRegistry<'a, S>) -> Self {
        Self { store, registry }
    }

    /// Apply every observation of `snapshot` in order.
    ///
    /// Skipped cells are logged and counted; any store or registry failure
    /// stops the pass and is returned. Writes made before the failure stay
    /// committed.
    pub async fn apply_snapshot(
        &mut self,
        date: NaiveDate,
        path: IngestPath,
        snapshot: &Snapshot,
    ) -> Result<PassReport> {
        let mut report = PassReport::default();

        for skipped in &snapshot.skipped {
            warn!(
                %date,
                game = %skipped.game_name,
                raw_count = %skipped.raw_count,
                position = skipped.position,
                "skipping malformed play count"
            );
        }
        report.skipped_cells = snapshot.skipped.len() as u64;

        for obs in &snapshot.observations {
            let (mutation, created) = self.apply_observation(date, path, obs).await?;
            if created {
                report.games_created += 1;
            }
            match mutation {
                Some(m) => report.record(&m),
                None => report.skipped_cells += 1,
            }
        }

        Ok(report)
    }

    async fn apply_observation(
        &mut self,
        date: NaiveDate,
        path: IngestPath,
        obs: &Observation,
    ) -> Result<(Option<PlayMutation>, bool)> {
        let game = self
            .registry
            .resolve(&obs.game_name)
            .await
            .with_context(|| format!("resolve game '{}'", obs.game_name))?;
        let key = PlayKey::new(date, game.game_id);

        // A game registered just now cannot have a record yet.
        let existing = if game.created {
            None
        } else {
            self.store
                .find_play_record(&key)
                .await
                .with_context(|| format!("find play record {date} '{}'", obs.game_name))?
                .map(|row| row.totals())
        };

        let mutation = plan(path, existing.as_ref(), obs.play_count);
        if matches!(mutation, PlayMutation::Increment { .. }) && mutation.apply_to(existing).is_none() {
            warn!(
                %date,
                game = %obs.game_name,
                count = obs.play_count,
                stored = ?existing.map(|t| t.play_count),
                "skipping play count that would overflow the stored total"
            );
            return Ok((None, game.created));
        }

        self.write(&key, existing, &mutation)
            .await
            .with_context(|| format!("{} play record {date} '{}'", mutation.kind(), obs.game_name))?;

        debug!(
            %date,
            path = path.as_str(),
            game = %obs.game_name,
            count = obs.play_count,
            mutation = mutation.kind(),
            merge_state = ?mutation.apply_to(existing).map(|t| t.merge_state),
            "reconciled observation"
        );

        Ok((Some(mutation), game.created))
    }

    async fn write(
        &self,
        key: &PlayKey,
        existing: Option<PlayTotals>,
        mutation: &PlayMutation,
    ) -> Result<()> {
        match *mutation {
            PlayMutation::Insert {
                play_count,
                merge_state,
            } => {
                let row = PlayRecordRow {
                    key: *key,
                    play_count,
                    merge_state,
                };
                self.store.insert_play_record(&row).await
            }
            PlayMutation::Increment { by, merge_state } => {
                let delta = PlayDelta::Increment { by, merge_state };
                self.store.update_play_record(key, &delta).await
            }
            PlayMutation::Overwrite { .. } => {
                let next = mutation
                    .apply_to(existing)
                    .ok_or_else(|| anyhow!("overwrite planned without an existing record"))?;
                let delta = PlayDelta::Set {
                    play_count: next.play_count,
                    merge_state: next.merge_state,
                };
                self.store.update_play_record(key, &delta).await
            }
            PlayMutation::Unchanged => Ok(()),
        }
    }
}
