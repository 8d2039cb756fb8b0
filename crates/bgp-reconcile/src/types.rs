use serde::{Deserialize, Serialize};
use std::fmt;

/// How a stored play total came to be.
///
/// `Unmerged` totals were written from a single sighting and may be replaced
/// by a larger authoritative read. Once a total has been produced by adding
/// two overlapping sightings it enters the merged states and never leaves
/// them; each later sighting adds to it and flips between `MergedOnce` and
/// `MergedTwice`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MergeState {
    Unmerged,
    MergedOnce,
    MergedTwice,
}

impl MergeState {
    pub const ALL: [MergeState; 3] = [
        MergeState::Unmerged,
        MergeState::MergedOnce,
        MergeState::MergedTwice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MergeState::Unmerged => "UNMERGED",
            MergeState::MergedOnce => "MERGED_ONCE",
            MergeState::MergedTwice => "MERGED_TWICE",
        }
    }

    pub fn parse(s: &str) -> Result<Self, UnknownMergeState> {
        match s {
            "UNMERGED" => Ok(MergeState::Unmerged),
            "MERGED_ONCE" => Ok(MergeState::MergedOnce),
            "MERGED_TWICE" => Ok(MergeState::MergedTwice),
            other => Err(UnknownMergeState(other.to_string())),
        }
    }

    pub fn is_merged(&self) -> bool {
        !matches!(self, MergeState::Unmerged)
    }
}

impl fmt::Display for MergeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored merge-state string that is none of the known values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownMergeState(pub String);

impl fmt::Display for UnknownMergeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid merge state: {}", self.0)
    }
}

impl std::error::Error for UnknownMergeState {}

/// Which reconciliation rules apply to a pass over one date.
///
/// Selected once per date: the first pass ever seen for a date is
/// `Creation`, including both snapshots fetched in that pass. Every later
/// pass is `Update`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestPath {
    Creation,
    Update,
}

impl IngestPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestPath::Creation => "creation",
            IngestPath::Update => "update",
        }
    }
}

/// The mutable part of a play record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayTotals {
    pub play_count: i64,
    pub merge_state: MergeState,
}

impl PlayTotals {
    pub fn new(play_count: i64, merge_state: MergeState) -> Self {
        Self {
            play_count,
            merge_state,
        }
    }
}

/// One (game name, play count) pair read from a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub game_name: String,
    pub play_count: i64,
}

impl Observation {
    pub fn new(game_name: impl Into<String>, play_count: i64) -> Self {
        Self {
            game_name: game_name.into(),
            play_count,
        }
    }
}

/// What the store must do with one observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMutation {
    /// No record yet: insert one.
    Insert {
        play_count: i64,
        merge_state: MergeState,
    },
    /// Add `by` to the stored count and set the merge state.
    Increment { by: i64, merge_state: MergeState },
    /// Replace the stored count; the merge state stays as it is.
    Overwrite { play_count: i64 },
    /// Stale or smaller read.
    Unchanged,
}

impl PlayMutation {
    /// Totals after applying this mutation to `existing`.
    ///
    /// Returns `None` for `Unchanged`/`Increment`/`Overwrite` against a
    /// missing record, which `plan` never produces, and for an `Increment`
    /// whose sum does not fit in an `i64`.
    pub fn apply_to(&self, existing: Option<PlayTotals>) -> Option<PlayTotals> {
        match (*self, existing) {
            (
                PlayMutation::Insert {
                    play_count,
                    merge_state,
                },
                _,
            ) => Some(PlayTotals::new(play_count, merge_state)),
            (PlayMutation::Increment { by, merge_state }, Some(cur)) => {
                let play_count = cur.play_count.checked_add(by)?;
                Some(PlayTotals::new(play_count, merge_state))
            }
            (PlayMutation::Overwrite { play_count }, Some(cur)) => {
                Some(PlayTotals::new(play_count, cur.merge_state))
            }
            (PlayMutation::Unchanged, Some(cur)) => Some(cur),
            (_, None) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PlayMutation::Insert { .. } => "insert",
            PlayMutation::Increment { .. } => "increment",
            PlayMutation::Overwrite { .. } => "overwrite",
            PlayMutation::Unchanged => "unchanged",
        }
    }

    pub fn writes(&self) -> bool {
        !matches!(self, PlayMutation::Unchanged)
    }
}
