//! Error types for the Ledgerlift extraction pipeline.
//!
//! - [`ExtractError`] - file-level extraction failures
//! - [`DelimitedError`] - text fallback failures
//! - [`ConfigError`] - alias table and settings problems
//! - [`ServerError`] - HTTP upload handling errors
//!
//! Row-level problems are never errors: the record extractor drops the row
//! and records a [`crate::models::SkippedRow`] instead.

use thiserror::Error;

// =============================================================================
// Extraction Errors
// =============================================================================

/// File-level failures of a single extraction call.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Extension is neither `xls` nor `xlsx`.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Bytes could not be read by any supported strategy.
    #[error("Failed to parse file as {strategy}: {message}")]
    FormatParse { strategy: String, message: String },

    /// No candidate row produced a usable header mapping.
    #[error("No header row found: {0}")]
    NoHeaderFound(String),

    /// File could not be read from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ExtractError {
    pub fn format_parse(strategy: impl Into<String>, message: impl ToString) -> Self {
        ExtractError::FormatParse {
            strategy: strategy.into(),
            message: message.to_string(),
        }
    }

    /// True for failures caused by the uploaded file itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExtractError::UnsupportedFormat(_) | ExtractError::FormatParse { .. }
        )
    }
}

// =============================================================================
// Delimited Text Errors
// =============================================================================

/// Errors while reading delimited text saved under a spreadsheet extension.
#[derive(Debug, Error)]
pub enum DelimitedError {
    /// Decoded content contains NUL characters.
    #[error("content is binary, not text")]
    Binary,

    /// Nothing but whitespace.
    #[error("file is empty")]
    EmptyFile,

    /// Record-level CSV failure.
    #[error("invalid delimited text: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building an [`crate::config::ExtractorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Alias file could not be read.
    #[error("Failed to read alias file: {0}")]
    Io(#[from] std::io::Error),

    /// Alias file is not valid JSON for an alias table.
    #[error("Invalid alias file: {0}")]
    Json(#[from] serde_json::Error),

    /// A field has no aliases at all.
    #[error("Field '{0}' has no aliases")]
    EmptyAliases(String),

    /// Threshold outside the 0-100 similarity scale.
    #[error("Invalid threshold for {name}: {value}")]
    InvalidThreshold { name: String, value: String },

    /// Port that does not parse as a TCP port number.
    #[error("Invalid port in {name}: {value}")]
    InvalidPort { name: String, value: String },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP upload errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Extraction failed.
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Result type for the delimited-text reader.
pub type DelimitedResult<T> = Result<T, DelimitedError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
