//! Snapshot cell layout.
//!
//! A fetched leaderboard table arrives as a flat, ordered list of non-empty
//! text cells. The first [`HEADER_CELLS`] cells are column headers; after
//! that the table repeats in rows of [`ROW_STRIDE`] cells: game name, play
//! count, and one trailing cell that is ignored.

use crate::Observation;
use std::fmt;

/// Header cells to skip before the first row.
pub const HEADER_CELLS: usize = 3;
/// Cells per table row.
pub const ROW_STRIDE: usize = 3;
/// Largest play count accepted from a single cell. Larger readings are
/// treated as malformed so that repeated additions stay well inside `i64`.
pub const MAX_PLAY_COUNT: i64 = 1_000_000_000;

/// Observations parsed from one snapshot, plus the rows that were skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub observations: Vec<Observation>,
    pub skipped: Vec<SkippedCell>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// A row whose play-count cell could not be read as a non-negative integer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedCell {
    /// Index of the play-count cell in the flat cell list.
    pub position: usize,
    pub game_name: String,
    /// Raw cell text; empty when the table ended before the count cell.
    pub raw_count: String,
}

/// The table does not have the expected shape at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotShapeError {
    /// Fewer cells than the header row.
    MissingHeader { cells: usize },
}

impl fmt::Display for SnapshotShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotShapeError::MissingHeader { cells } => write!(
                f,
                "snapshot table has {cells} cell(s); expected at least {HEADER_CELLS} header cells"
            ),
        }
    }
}

impl std::error::Error for SnapshotShapeError {}

/// Parse a play-count cell.
///
/// Accepts surrounding whitespace and `,` thousands separators. Rejects
/// empty cells, signs, counts above [`MAX_PLAY_COUNT`], and anything else
/// that is not a plain integer.
pub fn parse_play_count(raw: &str) -> Option<i64> {
    let t = raw.trim();
    if t.is_empty() || t.starts_with(',') || t.ends_with(',') || t.contains(",,") {
        return None;
    }
    let digits: String = t.chars().filter(|c| *c != ',').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits
        .parse::<i64>()
        .ok()
        .filter(|n| *n <= MAX_PLAY_COUNT)
}

/// Walk the cell list with the fixed header offset and row stride.
///
/// A malformed count skips only its own row; the stride is unaffected, so
/// the next row is read from where it would have been anyway.
pub fn snapshot_from_cells<S: AsRef<str>>(cells: &[S]) -> Result<Snapshot, SnapshotShapeError> {
    if cells.len() < HEADER_CELLS {
        return Err(SnapshotShapeError::MissingHeader { cells: cells.len() });
    }

    let mut snap = Snapshot::default();
    let mut row_start = HEADER_CELLS;

    while row_start < cells.len() {
        let name = cells[row_start].as_ref().trim();
        let count_pos = row_start + 1;
        let raw = cells.get(count_pos).map(|c| c.as_ref()).unwrap_or("");

        match parse_play_count(raw) {
            Some(n) => snap.observations.push(Observation::new(name, n)),
            None => snap.skipped.push(SkippedCell {
                position: count_pos,
                game_name: name.to_string(),
                raw_count: raw.to_string(),
            }),
        }

        row_start += ROW_STRIDE;
    }

    Ok(snap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<&'static str> {
        vec!["Game", "Plays", "Chart"]
    }

    #[test]
    fn reads_rows_after_header_with_fixed_stride() {
        let mut cells = header();
        cells.extend(["Azul", "12", "|", "Catan", "7", "|"]);

        let snap = snapshot_from_cells(&cells).unwrap();
        assert_eq!(
            snap.observations,
            vec![Observation::new("Azul", 12), Observation::new("Catan", 7)]
        );
        assert!(snap.skipped.is_empty());
    }

    #[test]
    fn malformed_count_skips_only_that_row() {
        let mut cells = header();
        cells.extend([
            "Azul", "12", "|", "RetroQuest", "n/a", "|", "Catan", "7", "|",
        ]);

        let snap = snapshot_from_cells(&cells).unwrap();
        assert_eq!(
            snap.observations,
            vec![Observation::new("Azul", 12), Observation::new("Catan", 7)]
        );
        assert_eq!(
            snap.skipped,
            vec![SkippedCell {
                position: 7,
                game_name: "RetroQuest".to_string(),
                raw_count: "n/a".to_string(),
            }]
        );
    }

    #[test]
    fn trailing_name_without_count_is_skipped() {
        let mut cells = header();
        cells.extend(["Azul", "12", "|", "Orphan"]);

        let snap = snapshot_from_cells(&cells).unwrap();
        assert_eq!(snap.observations.len(), 1);
        assert_eq!(snap.skipped[0].game_name, "Orphan");
        assert_eq!(snap.skipped[0].raw_count, "");
    }

    #[test]
    fn header_only_table_is_an_empty_snapshot() {
        let snap = snapshot_from_cells(&header()).unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn too_few_cells_is_a_shape_error() {
        let err = snapshot_from_cells(&["Game"]).unwrap_err();
        assert_eq!(err, SnapshotShapeError::MissingHeader { cells: 1 });
    }

    #[test]
    fn play_count_parsing() {
        assert_eq!(parse_play_count("42"), Some(42));
        assert_eq!(parse_play_count(" 42 "), Some(42));
        assert_eq!(parse_play_count("1,024"), Some(1024));
        assert_eq!(parse_play_count("0"), Some(0));
        assert_eq!(parse_play_count(""), None);
        assert_eq!(parse_play_count("n/a"), None);
        assert_eq!(parse_play_count("-3"), None);
        assert_eq!(parse_play_count("+3"), None);
        assert_eq!(parse_play_count("4.5"), None);
        assert_eq!(parse_play_count(",12"), None);
        assert_eq!(parse_play_count("1,,2"), None);
    }

    #[test]
    fn oversized_count_is_skipped_like_any_malformed_cell() {
        assert_eq!(parse_play_count("1,000,000,000"), Some(MAX_PLAY_COUNT));
        assert_eq!(parse_play_count("1,000,000,001"), None);
        assert_eq!(parse_play_count("9,223,372,036,854,775,807"), None);
        assert_eq!(parse_play_count("99999999999999999999"), None);

        let mut cells = header();
        cells.extend(["Huge", "9,223,372,036,854,775,807", "|", "Azul", "3", "|"]);
        let snap = snapshot_from_cells(&cells).unwrap();
        assert_eq!(snap.observations, vec![Observation::new("Azul", 3)]);
        assert_eq!(snap.skipped.len(), 1);
        assert_eq!(snap.skipped[0].game_name, "Huge");
        assert_eq!(snap.skipped[0].position, 4);
    }
}
