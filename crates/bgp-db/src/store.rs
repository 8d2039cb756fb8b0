//! Store contracts used by the ingestion engine.
//!
//! Lookups are exact-match on `(play_date, game_id)`, `name`, or
//! `play_date`; no range queries. Implementations must give read-your-writes
//! consistency within one reconciliation pass: a write is visible to the
//! next read issued by the same caller.

use anyhow::Result;
use bgp_reconcile::{MergeState, PlayTotals};
use chrono::NaiveDate;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub game_id: Uuid,
    pub name: String,
    pub color_tag: String,
}

/// Composite key of a play record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayKey {
    pub play_date: NaiveDate,
    pub game_id: Uuid,
}

impl PlayKey {
    pub fn new(play_date: NaiveDate, game_id: Uuid) -> Self {
        Self { play_date, game_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayRecordRow {
    pub key: PlayKey,
    pub play_count: i64,
    pub merge_state: MergeState,
}

impl PlayRecordRow {
    pub fn totals(&self) -> PlayTotals {
        PlayTotals::new(self.play_count, self.merge_state)
    }
}

/// Update applied to an existing play record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayDelta {
    /// `play_count += by`, then set `merge_state`.
    Increment { by: i64, merge_state: MergeState },
    /// Set both fields outright.
    Set {
        play_count: i64,
        merge_state: MergeState,
    },
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
pub trait GameStore: Send + Sync {
    async fn find_game_by_name(&self, name: &str) -> Result<Option<GameRow>>;

    async fn insert_game(&self, game: &GameRow) -> Result<()>;

    /// Claim `tag` in the used-tag registry.
    ///
    /// Returns `false` when the tag was already claimed; the registry is left
    /// unchanged in that case.
    async fn claim_color_tag(&self, tag: &str) -> Result<bool>;

    async fn count_games(&self) -> Result<i64>;
}

#[async_trait::async_trait]
pub trait PlayRecordStore: Send + Sync {
    async fn find_play_record(&self, key: &PlayKey) -> Result<Option<PlayRecordRow>>;

    /// Insert a new record. Fails if one already exists for the key.
    async fn insert_play_record(&self, row: &PlayRecordRow) -> Result<()>;

    /// Apply `delta` to the record at `key`. Fails if no record exists.
    async fn update_play_record(&self, key: &PlayKey, delta: &PlayDelta) -> Result<()>;

    async fn count_play_records(&self) -> Result<i64>;
}

#[async_trait::async_trait]
pub trait DateMarkerStore: Send + Sync {
    async fn date_marker_exists(&self, play_date: NaiveDate) -> Result<bool>;

    /// Create the marker if absent. Idempotent.
    async fn insert_date_marker(&self, play_date: NaiveDate) -> Result<()>;
}

/// Everything one ingestion run needs from a store.
pub trait LedgerStore: GameStore + PlayRecordStore + DateMarkerStore {}

impl<T: GameStore + PlayRecordStore + DateMarkerStore> LedgerStore for T {}
