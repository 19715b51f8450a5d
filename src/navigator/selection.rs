//! Selection memory.
//!
//! When the user backs out of a detail view, the cursor should land on the
//! row they came from even if the list shifted underneath them. A stable id
//! match always wins; otherwise the remembered positional index is clamped
//! into range; an empty list carries no selection at all.

use crate::models::Item;

/// What a view remembers about the row that was activated to leave it.
#[derive(Debug, Clone, PartialEq)]
pub struct Remembered {
    pub index: usize,
    pub stable_id: Option<crate::models::StableId>,
}

/// First row that is actual content, skipping pagination controls.
pub fn first_content_row(rows: &[Item]) -> Option<usize> {
    rows.iter().position(Item::is_content)
}

/// Selection for a freshly rebuilt row set.
///
/// With nothing remembered this is a fresh navigation and the first content
/// row is selected.
pub fn restore(rows: &[Item], remembered: Option<&Remembered>) -> Option<usize> {
    if rows.is_empty() {
        return None;
    }
    let Some(mem) = remembered else {
        return first_content_row(rows);
    };

    if let Some(stable) = mem.stable_id {
        if let Some(index) = rows.iter().position(|row| row.stable_id() == Some(stable)) {
            return Some(index);
        }
    }
    Some(mem.index.min(rows.len() - 1))
}
