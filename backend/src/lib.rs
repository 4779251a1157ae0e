//! # Ledgerlift - bank statement spreadsheet extraction
//!
//! Ledgerlift reads bank-exported statements (`.xls`, `.xlsx`, or delimited
//! text saved as `.xls`) whose layout varies from bank to bank, and returns
//! normalized transactions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  .xls/.xlsx │────▶│   Reader    │────▶│  Matching   │────▶│   Records   │
//! │ (or CSV/TSV)│     │ (+fallback) │     │ (fuzzy hdr) │     │ (normalized)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ledgerlift::extract;
//!
//! fn main() {
//!     let records = extract("statement.xls").unwrap();
//!     println!("Extracted {} transactions", records.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Cells, sheets, fields and records
//! - [`config`] - Alias table, thresholds and environment settings
//! - [`reader`] - Format-tolerant sheet reading
//! - [`matching`] - Fuzzy similarity, header location and schema matching
//! - [`extract`] - Record extraction and the high-level pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Reading
pub mod reader;

// Header discovery
pub mod matching;

// Extraction
pub mod extract;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, DelimitedError, ExtractError, ExtractResult, ServerError,
    ServerResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Cell, Field, HeaderMapping, Sheet, SkippedRow, StatementSummary, TransactionRecord,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{AliasTable, ExtractorConfig, Settings};

// =============================================================================
// Re-exports - Reader
// =============================================================================

pub use reader::{read_bytes, read_sheet, SourceFormat, SpreadsheetKind};

// =============================================================================
// Re-exports - Matching
// =============================================================================

pub use matching::{
    locate_header_candidates, match_schema, weighted_ratio, SchemaMatch, Similarity,
    WeightedRatio,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use extract::{extract, ExtractionReport, RecordExtractor, StatementExtractor};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
