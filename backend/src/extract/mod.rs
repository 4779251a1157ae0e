//! Record extraction: header discovery output turned into transactions.
//!
//! - [`normalize`] - Date and amount normalization
//! - [`records`] - Lazy row walker with skip diagnostics
//! - [`pipeline`] - File-level orchestration

pub mod normalize;
pub mod pipeline;
pub mod records;

pub use normalize::{normalize_date, to_amount};
pub use pipeline::{extract, ExtractionReport, StatementExtractor};
pub use records::{RecordExtractor, SkipReason};
