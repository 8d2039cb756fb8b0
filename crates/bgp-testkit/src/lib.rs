//! bgp-testkit
//!
//! In-process doubles for scenario tests: a ledger store backed by maps and
//! a scripted leaderboard source. No database, no network.

mod memory_store;
mod scripted_source;

pub use memory_store::MemoryLedgerStore;
pub use scripted_source::ScriptedSource;

/// Header cells of the plays table.
pub const HEADER: [&str; 3] = ["Game", "Plays", "Chart"];

/// Flat table cells for `rows` of (name, raw count), header included, with
/// the chart cell after each pair.
pub fn cells(rows: &[(&str, &str)]) -> Vec<String> {
    let mut out: Vec<String> = HEADER.iter().map(|s| s.to_string()).collect();
    for (name, count) in rows {
        out.push(name.to_string());
        out.push(count.to_string());
        out.push("|".to_string());
    }
    out
}

/// Like [`cells`] with numeric counts.
pub fn count_cells(rows: &[(&str, i64)]) -> Vec<String> {
    let raw: Vec<(&str, String)> = rows.iter().map(|(n, c)| (*n, c.to_string())).collect();
    let refs: Vec<(&str, &str)> = raw.iter().map(|(n, c)| (*n, c.as_str())).collect();
    cells(&refs)
}
