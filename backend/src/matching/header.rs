//! Header row candidates.
//!
//! A statement's header is anchored by its date column label, so only the
//! first column is scanned. Disclaimers and repeated headers may produce
//! several candidates; the schema matcher picks among them.

use std::collections::BTreeSet;

use super::fuzzy::Similarity;
use crate::models::{Cell, Sheet};

/// Rows whose first cell is text resembling one of `date_aliases`.
pub fn locate_header_candidates<S: Similarity + ?Sized>(
    sheet: &Sheet,
    date_aliases: &[String],
    similarity: &S,
    threshold: u8,
) -> BTreeSet<usize> {
    let mut candidates = BTreeSet::new();

    for (row_idx, cell) in sheet.first_column() {
        let Cell::Text(text) = cell else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        if date_aliases
            .iter()
            .any(|alias| similarity.score(alias, text) > threshold)
        {
            candidates.insert(row_idx);
        }
    }

    candidates
}
