//! Leaderboard table extraction.

use scraper::{Html, Selector};

use crate::provider::SourceError;

/// CSS selector for the site's data tables.
pub const TABLE_SELECTOR: &str = "table.forum_table";

/// The plays table is the second `forum_table` on the page; the first one is
/// the page's filter form.
pub const PLAYS_TABLE_INDEX: usize = 1;

/// Return the stripped, non-empty text nodes of the plays table in document
/// order.
pub fn extract_table_cells(html: &str) -> Result<Vec<String>, SourceError> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse(TABLE_SELECTOR)
        .map_err(|e| SourceError::Decode(format!("bad table selector: {e}")))?;

    let tables: Vec<_> = document.select(&table_sel).collect();
    let table = tables.get(PLAYS_TABLE_INDEX).ok_or_else(|| {
        SourceError::Structure(format!(
            "expected at least {} `{}` elements, found {}",
            PLAYS_TABLE_INDEX + 1,
            TABLE_SELECTOR,
            tables.len()
        ))
    })?;

    Ok(table
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect())
}
