//! Header row selection and field-to-column mapping.
//!
//! Every candidate row is scored by how many distinct semantic fields its
//! cells match. The row with the strictly greatest count wins, so ties go to
//! the earliest row.

use std::collections::BTreeSet;

use super::fuzzy::Similarity;
use crate::config::AliasTable;
use crate::error::{ExtractError, ExtractResult};
use crate::models::{Field, HeaderMapping, Sheet};

/// The chosen header row and its mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMatch {
    pub header_row: usize,
    pub mapping: HeaderMapping,
}

/// Pick the best header among `candidates`.
///
/// Fails with [`ExtractError::NoHeaderFound`] when no candidate matches any
/// field. Partial mappings are returned as-is.
pub fn match_schema<S: Similarity + ?Sized>(
    sheet: &Sheet,
    candidates: &BTreeSet<usize>,
    aliases: &AliasTable,
    similarity: &S,
    threshold: u8,
) -> ExtractResult<SchemaMatch> {
    let mut best: Option<SchemaMatch> = None;

    for &row_idx in candidates {
        let Some(row) = sheet.row(row_idx) else {
            continue;
        };
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        let mapping = map_row(&cells, aliases, similarity, threshold);

        let best_count = best.as_ref().map_or(0, |b| b.mapping.len());
        if mapping.len() > best_count {
            let complete = mapping.len() == Field::ALL.len();
            best = Some(SchemaMatch {
                header_row: row_idx,
                mapping,
            });
            if complete {
                break;
            }
        }
    }

    best.ok_or_else(|| {
        ExtractError::NoHeaderFound(format!(
            "none of {} candidate row(s) matched a known column label",
            candidates.len()
        ))
    })
}

/// Map fields to cells of one row; a cell can be claimed by one field only.
fn map_row<S: Similarity + ?Sized>(
    cells: &[String],
    aliases: &AliasTable,
    similarity: &S,
    threshold: u8,
) -> HeaderMapping {
    let mut mapping = HeaderMapping::new();

    for field in Field::ALL {
        let claimed = aliases.get(field).iter().find_map(|alias| {
            cells.iter().enumerate().find_map(|(col, text)| {
                let free = !mapping.contains_column(col);
                (free && similarity.score(alias, text) > threshold).then_some(col)
            })
        });
        if let Some(col) = claimed {
            mapping.insert(field, col);
        }
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::WeightedRatio;
    use crate::models::Cell;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    fn run(sheet: &Sheet, candidates: &[usize]) -> ExtractResult<SchemaMatch> {
        let set: BTreeSet<usize> = candidates.iter().copied().collect();
        match_schema(sheet, &set, &AliasTable::default(), &WeightedRatio, 80)
    }

    #[test]
    fn test_header_at_row_five_maps_all_fields() {
        let mut rows = vec![row(&["Bank statement"]); 5];
        rows.push(row(&["Date", "Narration", "Debit", "Credit"]));
        rows.push(row(&["01-04-2024", "Coffee", "120", ""]));
        let sheet = Sheet::new(rows);

        let found = run(&sheet, &[5]).unwrap();
        assert_eq!(found.header_row, 5);
        assert_eq!(found.mapping.get(Field::Date), Some(0));
        assert_eq!(found.mapping.get(Field::Description), Some(1));
        assert_eq!(found.mapping.get(Field::Withdrawal), Some(2));
        assert_eq!(found.mapping.get(Field::Deposit), Some(3));
    }

    #[test]
    fn test_reordered_columns() {
        let sheet = Sheet::new(vec![row(&[
            "Value Date",
            "Amount Deposited",
            "Particulars",
            "Amount Withdrawn",
        ])]);
        let found = run(&sheet, &[0]).unwrap();
        assert_eq!(found.mapping.get(Field::Date), Some(0));
        assert_eq!(found.mapping.get(Field::Deposit), Some(1));
        assert_eq!(found.mapping.get(Field::Description), Some(2));
        assert_eq!(found.mapping.get(Field::Withdrawal), Some(3));
    }

    #[test]
    fn test_best_row_wins_over_disclaimer() {
        let sheet = Sheet::new(vec![
            row(&["Statement Date", "01-04-2024"]),
            row(&["Date", "Description", "Withdrawal", "Deposit"]),
        ]);
        let found = run(&sheet, &[0, 1]).unwrap();
        assert_eq!(found.header_row, 1);
        assert_eq!(found.mapping.len(), 4);
    }

    #[test]
    fn test_tie_goes_to_first_row() {
        let sheet = Sheet::new(vec![
            row(&["Date", "Narration"]),
            row(&["Date", "Narration"]),
        ]);
        let found = run(&sheet, &[0, 1]).unwrap();
        assert_eq!(found.header_row, 0);
        assert_eq!(found.mapping.len(), 2);
    }

    #[test]
    fn test_cell_claimed_once() {
        let sheet = Sheet::new(vec![row(&["Date"])]);
        let only_date = |a: &str, b: &str| -> u8 {
            if b == "Date" && (a == "date" || a == "description") {
                100
            } else {
                0
            }
        };
        let set: BTreeSet<usize> = [0].into_iter().collect();
        let found = match_schema(&sheet, &set, &AliasTable::default(), &only_date, 80).unwrap();
        assert_eq!(found.mapping.get(Field::Date), Some(0));
        assert_eq!(found.mapping.get(Field::Description), None);
    }

    #[test]
    fn test_partial_mapping_is_returned() {
        let sheet = Sheet::new(vec![row(&["Debit", "Credit"])]);
        let found = run(&sheet, &[0]).unwrap();
        assert_eq!(found.mapping.len(), 2);
        assert!(!found.mapping.is_extractable());
    }

    #[test]
    fn test_no_match_is_an_error() {
        let sheet = Sheet::new(vec![row(&["Foo", "Bar"])]);
        assert!(matches!(run(&sheet, &[0]), Err(ExtractError::NoHeaderFound(_))));
        assert!(matches!(run(&sheet, &[]), Err(ExtractError::NoHeaderFound(_))));
    }
}
