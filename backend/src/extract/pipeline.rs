//! High-level extraction API.
//!
//! Combines every stage: reading, header location, schema matching and
//! record extraction.
//!
//! # Example
//!
//! ```rust,ignore
//! use ledgerlift::extract;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let records = extract("statement.xls")?;
//!     println!("Extracted {} transactions", records.len());
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::records::RecordExtractor;
use crate::config::ExtractorConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::matching::{locate_header_candidates, match_schema, Similarity, WeightedRatio};
use crate::models::{Field, HeaderMapping, Sheet, SkippedRow, StatementSummary, TransactionRecord};
use crate::reader::{read_sheet, SourceFormat};

/// Everything learned while extracting one file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    /// Reader strategy that produced the sheet
    pub format: Option<SourceFormat>,

    /// Rows whose first cell resembled a date label
    pub candidates: Vec<usize>,

    /// `None` when the sheet had no rows
    pub header_row: Option<usize>,

    pub mapping: HeaderMapping,

    pub records: Vec<TransactionRecord>,

    pub skipped: Vec<SkippedRow>,
}

impl ExtractionReport {
    fn empty() -> Self {
        Self {
            format: None,
            candidates: Vec::new(),
            header_row: None,
            mapping: HeaderMapping::new(),
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn summary(&self) -> StatementSummary {
        StatementSummary::from_records(&self.records)
    }
}

/// Extraction engine bound to one configuration.
#[derive(Debug, Clone)]
pub struct StatementExtractor<S = WeightedRatio> {
    config: ExtractorConfig,
    similarity: S,
}

impl StatementExtractor<WeightedRatio> {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            similarity: WeightedRatio,
        }
    }
}

impl Default for StatementExtractor<WeightedRatio> {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl<S: Similarity> StatementExtractor<S> {
    /// Use a different header similarity measure.
    pub fn with_similarity<T: Similarity>(self, similarity: T) -> StatementExtractor<T> {
        StatementExtractor {
            config: self.config,
            similarity,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Records of the statement at `path`.
    pub fn extract(&self, path: impl AsRef<Path>) -> ExtractResult<Vec<TransactionRecord>> {
        Ok(self.extract_report(path)?.records)
    }

    /// Records of the statement at `path` along with diagnostics.
    pub fn extract_report(&self, path: impl AsRef<Path>) -> ExtractResult<ExtractionReport> {
        let (sheet, format) = read_sheet(path)?;
        info!(format = %format, rows = sheet.len(), "sheet loaded");

        let mut report = self.extract_sheet(&sheet)?;
        report.format = Some(format);
        Ok(report)
    }

    /// Run header discovery and record extraction over an in-memory sheet.
    pub fn extract_sheet(&self, sheet: &Sheet) -> ExtractResult<ExtractionReport> {
        if sheet.is_empty() {
            return Ok(ExtractionReport::empty());
        }

        let candidates = locate_header_candidates(
            sheet,
            self.config.aliases.get(Field::Date),
            &self.similarity,
            self.config.header_threshold,
        );

        let schema = match_schema(
            sheet,
            &candidates,
            &self.config.aliases,
            &self.similarity,
            self.config.field_threshold,
        )?;

        if !schema.mapping.is_extractable() {
            let matched: Vec<String> = schema
                .mapping
                .fields()
                .map(|(field, col)| format!("{}@{}", field, col))
                .collect();
            return Err(ExtractError::NoHeaderFound(format!(
                "row {} lacks a date or description column (matched: {})",
                schema.header_row,
                if matched.is_empty() {
                    "nothing".to_string()
                } else {
                    matched.join(", ")
                }
            )));
        }

        info!(
            header_row = schema.header_row,
            fields = schema.mapping.len(),
            "header row selected"
        );

        let mut extractor = RecordExtractor::new(
            sheet,
            schema.header_row,
            &schema.mapping,
            &self.config.date_formats,
        );
        let records: Vec<TransactionRecord> = extractor.by_ref().collect();
        let skipped = extractor.into_skipped();

        info!(
            records = records.len(),
            skipped = skipped.len(),
            "extraction complete"
        );

        Ok(ExtractionReport {
            format: None,
            candidates: candidates.into_iter().collect(),
            header_row: Some(schema.header_row),
            mapping: schema.mapping,
            records,
            skipped,
        })
    }
}

/// Extract the statement at `path` with the default configuration.
pub fn extract(path: impl AsRef<Path>) -> ExtractResult<Vec<TransactionRecord>> {
    StatementExtractor::new(ExtractorConfig::default()).extract(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    fn engine() -> StatementExtractor {
        StatementExtractor::new(ExtractorConfig::default())
    }

    fn statement() -> Sheet {
        Sheet::new(vec![
            text_row(&["ACME Bank"]),
            text_row(&["Statement for account 1234"]),
            text_row(&["Date of issue: 05-05-2024"]),
            text_row(&[]),
            text_row(&["Period 01-04-2024 to 30-04-2024"]),
            text_row(&["Date", "Narration", "Debit", "Credit"]),
            text_row(&["01-04-2024", "UPI/Coffee", "120.50", ""]),
            text_row(&["02-04-2024", "Salary", "", "50,000.00"]),
            text_row(&["Total:", "", "120.50", "50,000.00"]),
        ])
    }

    #[test]
    fn test_extract_sheet() {
        let report = engine().extract_sheet(&statement()).unwrap();

        assert_eq!(report.header_row, Some(5));
        assert_eq!(report.mapping.get(Field::Deposit), Some(3));
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.summary().total_deposits, 50000.0);
    }

    #[test]
    fn test_empty_sheet_is_empty_result() {
        let report = engine().extract_sheet(&Sheet::default()).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.header_row, None);
    }

    #[test]
    fn test_amounts_only_header_rejected() {
        let sheet = Sheet::new(vec![
            text_row(&["Date", "Debit", "Credit"]),
            text_row(&["01-04-2024", "5", ""]),
        ]);
        let err = engine().extract_sheet(&sheet).unwrap_err();
        match err {
            ExtractError::NoHeaderFound(msg) => {
                assert!(msg.contains("date@0"));
                assert!(msg.contains("withdrawal@1"));
            }
            other => panic!("expected NoHeaderFound, got {other:?}"),
        }
    }

    #[test]
    fn test_no_candidates() {
        let sheet = Sheet::new(vec![text_row(&["Account", "Balance"]), text_row(&["1", "2"])]);
        let err = engine().extract_sheet(&sheet).unwrap_err();
        assert!(matches!(err, ExtractError::NoHeaderFound(_)));
    }

    #[test]
    fn test_custom_similarity() {
        let exact = |a: &str, b: &str| -> u8 {
            if a.eq_ignore_ascii_case(b.trim()) {
                100
            } else {
                0
            }
        };
        let sheet = Sheet::new(vec![
            text_row(&["Date", "Narration", "Debit", "Credit"]),
            text_row(&["01-04-2024", "Coffee", "3", ""]),
        ]);
        let report = engine()
            .with_similarity(exact)
            .extract_sheet(&sheet)
            .unwrap();
        assert_eq!(report.records.len(), 1);
    }
}
