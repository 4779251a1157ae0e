//! Domain models for the Ledgerlift extraction pipeline.
//!
//! - [`Cell`] - Tagged cell value, identical for every source format
//! - [`Sheet`] - Rectangular-ish grid of cells
//! - [`Field`] - The four semantic transaction fields
//! - [`HeaderMapping`] - Field to column index for one extraction call
//! - [`TransactionRecord`] - A normalized statement line
//! - [`StatementSummary`] - Aggregates computed by callers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Cells and Sheets
// =============================================================================

/// A spreadsheet cell, resolved once at read time.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    CalendarDate(NaiveDate),
    Empty,
}

impl Cell {
    /// Empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::CalendarDate(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::CalendarDate(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::CalendarDate(d)
    }
}

/// Shared by out-of-range lookups.
static EMPTY_CELL: Cell = Cell::Empty;

/// Ordered rows of cells from the first worksheet of a file.
///
/// Rows may differ in length; [`Sheet::cell`] pads with [`Cell::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[Cell]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First cell of every row, in row order.
    pub fn first_column(&self) -> impl Iterator<Item = (usize, &Cell)> {
        (0..self.rows.len()).map(move |i| (i, self.cell(i, 0)))
    }
}

// =============================================================================
// Semantic Fields
// =============================================================================

/// The four normalized transaction attributes every source column maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Date,
    Description,
    Withdrawal,
    Deposit,
}

impl Field {
    /// Matching order used by the schema matcher.
    pub const ALL: [Field; 4] = [
        Field::Date,
        Field::Description,
        Field::Withdrawal,
        Field::Deposit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Description => "description",
            Field::Withdrawal => "withdrawal",
            Field::Deposit => "deposit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Field to column index, derived once per sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderMapping {
    columns: BTreeMap<Field, usize>,
}

impl HeaderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, column: usize) {
        self.columns.insert(field, column);
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn contains_column(&self, column: usize) -> bool {
        self.columns.values().any(|&c| c == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Largest mapped column index, if any field is mapped.
    pub fn max_column(&self) -> Option<usize> {
        self.columns.values().copied().max()
    }

    /// Records can only be emitted when date and description are mapped.
    pub fn is_extractable(&self) -> bool {
        self.get(Field::Date).is_some() && self.get(Field::Description).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, usize)> + '_ {
        self.columns.iter().map(|(f, c)| (*f, *c))
    }
}

// =============================================================================
// Output Records
// =============================================================================

/// A normalized statement line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// ISO-8601 date, or the raw text when it could not be parsed.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Withdrawal")]
    pub withdrawal: f64,
    #[serde(rename = "Deposit")]
    pub deposit: f64,
}

/// A row dropped during extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    /// 0-based index in the sheet
    pub row: usize,
    pub reason: String,
}

/// Aggregates over an extracted statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementSummary {
    pub total_withdrawals: f64,
    pub total_deposits: f64,
    /// withdrawals minus deposits
    pub net: f64,
    pub count: usize,
}

impl StatementSummary {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let total_withdrawals: f64 = records.iter().map(|r| r.withdrawal).sum();
        let total_deposits: f64 = records.iter().map(|r| r.deposit).sum();
        Self {
            total_withdrawals,
            total_deposits,
            net: total_withdrawals - total_deposits,
            count: records.len(),
        }
    }
}
