//! bgp-reconcile
//!
//! Play-count reconciliation rules for re-published daily leaderboards.
//!
//! The same date is scraped more than once, and each scrape reads two pages
//! whose coverage can overlap. The rules here decide, per (date, game)
//! observation, whether the stored total is inserted, added to, overwritten,
//! or left alone:
//! - First pass over a date: duplicate sightings are folded additively.
//! - Later passes: unmerged totals are overwritten only by a larger total.
//! - Merged totals keep accumulating and toggle between the two merged states.
//!
//! Deterministic, pure logic. No IO. No store calls.

mod engine;
mod snapshot;
mod types;

pub use engine::plan;
pub use snapshot::{
    parse_play_count, snapshot_from_cells, SkippedCell, Snapshot, SnapshotShapeError,
    HEADER_CELLS, MAX_PLAY_COUNT, ROW_STRIDE,
};
pub use types::*;
