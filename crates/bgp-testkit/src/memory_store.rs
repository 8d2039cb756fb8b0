use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};
use bgp_db::{
    DateMarkerStore, GameRow, GameStore, PlayDelta, PlayKey, PlayRecordRow, PlayRecordStore,
};
use chrono::NaiveDate;

#[derive(Debug, Default)]
struct Ledger {
    games: BTreeMap<String, GameRow>,
    color_tags: BTreeSet<String>,
    records: BTreeMap<PlayKey, PlayRecordRow>,
    markers: BTreeSet<NaiveDate>,
}

/// Map-backed ledger with the same contract as the Postgres store.
///
/// `set_outage(true)` makes every trait call fail, as an unreachable store
/// would.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    ledger: Mutex<Ledger>,
    outage: AtomicBool,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    fn check_up(&self) -> Result<()> {
        if self.outage.load(Ordering::SeqCst) {
            bail!("memory ledger store unavailable");
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_up(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.check_up()?;
        Ok(self.lock())
    }

    // --- inspection helpers (ignore the outage switch) ---

    pub fn game(&self, name: &str) -> Option<GameRow> {
        self.lock().games.get(name).cloned()
    }

    pub fn games(&self) -> Vec<GameRow> {
        self.lock().games.values().cloned().collect()
    }

    pub fn record(&self, date: NaiveDate, name: &str) -> Option<PlayRecordRow> {
        let ledger = self.lock();
        let game = ledger.games.get(name)?;
        ledger
            .records
            .get(&PlayKey::new(date, game.game_id))
            .copied()
    }

    pub fn records_on(&self, date: NaiveDate) -> Vec<PlayRecordRow> {
        self.lock()
            .records
            .values()
            .filter(|r| r.key.play_date == date)
            .copied()
            .collect()
    }

    pub fn seen_dates(&self) -> Vec<NaiveDate> {
        self.lock().markers.iter().copied().collect()
    }

    pub fn claimed_tags(&self) -> usize {
        self.lock().color_tags.len()
    }
}

#[async_trait::async_trait]
impl GameStore for MemoryLedgerStore {
    async fn find_game_by_name(&self, name: &str) -> Result<Option<GameRow>> {
        Ok(self.lock_up()?.games.get(name).cloned())
    }

    async fn insert_game(&self, game: &GameRow) -> Result<()> {
        let mut ledger = self.lock_up()?;
        if ledger.games.contains_key(&game.name) {
            bail!("duplicate game name: {}", game.name);
        }
        if ledger.games.values().any(|g| g.color_tag == game.color_tag) {
            bail!("duplicate colour tag: {}", game.color_tag);
        }
        ledger.games.insert(game.name.clone(), game.clone());
        Ok(())
    }

    async fn claim_color_tag(&self, tag: &str) -> Result<bool> {
        Ok(self.lock_up()?.color_tags.insert(tag.to_string()))
    }

    async fn count_games(&self) -> Result<i64> {
        Ok(self.lock_up()?.games.len() as i64)
    }
}

#[async_trait::async_trait]
impl PlayRecordStore for MemoryLedgerStore {
    async fn find_play_record(&self, key: &PlayKey) -> Result<Option<PlayRecordRow>> {
        Ok(self.lock_up()?.records.get(key).copied())
    }

    async fn insert_play_record(&self, row: &PlayRecordRow) -> Result<()> {
        let mut ledger = self.lock_up()?;
        if row.play_count < 0 {
            bail!("negative play_count {}", row.play_count);
        }
        if ledger.records.contains_key(&row.key) {
            bail!("play record already exists for {:?}", row.key);
        }
        ledger.records.insert(row.key, *row);
        Ok(())
    }

    async fn update_play_record(&self, key: &PlayKey, delta: &PlayDelta) -> Result<()> {
        let mut ledger = self.lock_up()?;
        let rec = ledger
            .records
            .get_mut(key)
            .ok_or_else(|| anyhow!("no play record for {:?}", key))?;
        match *delta {
            PlayDelta::Increment { by, merge_state } => {
                rec.play_count = rec
                    .play_count
                    .checked_add(by)
                    .ok_or_else(|| anyhow!("play count out of range for {:?}", key))?;
                rec.merge_state = merge_state;
            }
            PlayDelta::Set {
                play_count,
                merge_state,
            } => {
                rec.play_count = play_count;
                rec.merge_state = merge_state;
            }
        }
        Ok(())
    }

    async fn count_play_records(&self) -> Result<i64> {
        Ok(self.lock_up()?.records.len() as i64)
    }
}

#[async_trait::async_trait]
impl DateMarkerStore for MemoryLedgerStore {
    async fn date_marker_exists(&self, play_date: NaiveDate) -> Result<bool> {
        Ok(self.lock_up()?.markers.contains(&play_date))
    }

    async fn insert_date_marker(&self, play_date: NaiveDate) -> Result<()> {
        self.lock_up()?.markers.insert(play_date);
        Ok(())
    }
}
