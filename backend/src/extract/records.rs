//! Row walker turning data rows into transaction records.
//!
//! [`RecordExtractor`] yields records lazily, starting at the row after the
//! header. Rows that cannot form a record are dropped and kept as
//! [`SkippedRow`] diagnostics; they never end the iteration.

use tracing::debug;

use super::normalize::{normalize_date, to_amount};
use crate::models::{Cell, Field, HeaderMapping, Sheet, SkippedRow, TransactionRecord};

/// Why a row was not turned into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BlankRow,
    ShortRow,
    UnmappedField(Field),
    InvalidDate,
    MissingDescription,
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            SkipReason::BlankRow => "blank row".to_string(),
            SkipReason::ShortRow => "row shorter than mapped columns".to_string(),
            SkipReason::UnmappedField(field) => format!("{} column not mapped", field),
            SkipReason::InvalidDate => "date cell has no digits".to_string(),
            SkipReason::MissingDescription => "description is blank".to_string(),
        }
    }
}

/// Lazy iterator over the records below a header row.
pub struct RecordExtractor<'a> {
    sheet: &'a Sheet,
    mapping: &'a HeaderMapping,
    date_formats: &'a [String],
    next_row: usize,
    skipped: Vec<SkippedRow>,
}

impl<'a> RecordExtractor<'a> {
    pub fn new(
        sheet: &'a Sheet,
        header_row: usize,
        mapping: &'a HeaderMapping,
        date_formats: &'a [String],
    ) -> Self {
        Self {
            sheet,
            mapping,
            date_formats,
            next_row: header_row + 1,
            skipped: Vec::new(),
        }
    }

    /// Rows dropped so far.
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn into_skipped(self) -> Vec<SkippedRow> {
        self.skipped
    }

    /// Build a record from one row, or say why it cannot be built.
    pub fn build_record(&self, row: &[Cell]) -> Result<TransactionRecord, SkipReason> {
        if row.iter().all(Cell::is_blank) {
            return Err(SkipReason::BlankRow);
        }
        if let Some(max_col) = self.mapping.max_column() {
            if row.len() <= max_col {
                return Err(SkipReason::ShortRow);
            }
        }

        let date_col = self
            .mapping
            .get(Field::Date)
            .ok_or(SkipReason::UnmappedField(Field::Date))?;
        let desc_col = self
            .mapping
            .get(Field::Description)
            .ok_or(SkipReason::UnmappedField(Field::Description))?;

        let date_cell = &row[date_col];
        if date_cell.is_blank() || !date_cell.to_string().chars().any(|c| c.is_ascii_digit()) {
            return Err(SkipReason::InvalidDate);
        }

        let desc_cell = &row[desc_col];
        if desc_cell.is_blank() {
            return Err(SkipReason::MissingDescription);
        }

        let amount = |field| {
            self.mapping
                .get(field)
                .map(|col| to_amount(&row[col]))
                .unwrap_or(0.0)
        };

        Ok(TransactionRecord {
            date: normalize_date(date_cell, self.date_formats),
            description: desc_cell.to_string().trim().to_string(),
            withdrawal: amount(Field::Withdrawal),
            deposit: amount(Field::Deposit),
        })
    }
}

impl Iterator for RecordExtractor<'_> {
    type Item = TransactionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(row) = self.sheet.row(self.next_row) {
            let idx = self.next_row;
            self.next_row += 1;

            match self.build_record(row) {
                Ok(record) => return Some(record),
                Err(reason) => {
                    debug!(row = idx, reason = %reason.describe(), "skipping row");
                    self.skipped.push(SkippedRow {
                        row: idx,
                        reason: reason.describe(),
                    });
                }
            }
        }
        None
    }
}
