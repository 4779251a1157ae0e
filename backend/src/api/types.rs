//! REST API types for statement uploads.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{SkippedRow, StatementSummary, TransactionRecord};

/// Upload outcome reported in [`StatementResponse::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Records were extracted
    Ready,
    /// The file was readable but no header row was recognised
    NoHeader,
    /// The upload was rejected or failed
    Error,
}

/// Response sent after a statement upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    /// Unique job identifier
    pub job_id: String,

    pub status: UploadStatus,

    /// Name of the uploaded file, as sent by the client
    pub file_name: String,

    pub transactions: Vec<TransactionRecord>,

    pub summary: StatementSummary,

    pub skipped_rows: Vec<SkippedRow>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatementResponse {
    pub fn ready(
        job_id: String,
        file_name: String,
        transactions: Vec<TransactionRecord>,
        skipped_rows: Vec<SkippedRow>,
    ) -> Self {
        let summary = StatementSummary::from_records(&transactions);
        Self {
            job_id,
            status: UploadStatus::Ready,
            file_name,
            transactions,
            summary,
            skipped_rows,
            error: None,
        }
    }

    /// Empty result carrying the header diagnostic.
    pub fn no_header(job_id: String, file_name: String, diagnostic: String) -> Self {
        Self {
            job_id,
            status: UploadStatus::NoHeader,
            file_name,
            transactions: Vec::new(),
            summary: StatementSummary::default(),
            skipped_rows: Vec::new(),
            error: Some(diagnostic),
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": UploadStatus::Error,
        "error": error,
        "transactions": [],
        "summary": StatementSummary::default(),
        "skippedRows": []
    })
}
