//! Response types for uploads and queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::row::Row;

/// Outcome of one RAG query against a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Generated answer
    pub answer: String,
    /// Retrieved rows, best match first
    pub relevant_rows: Vec<Row>,
}

/// Non-streaming query response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer
    pub response: String,
    /// Rows used as context
    pub relevant_data: Vec<Row>,
}

impl From<QueryResult> for QueryResponse {
    fn from(result: QueryResult) -> Self {
        Self {
            response: result.answer,
            relevant_data: result.relevant_rows,
        }
    }
}

/// First NDJSON line of a streamed query response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamedAnswer {
    pub response: String,
}

/// Second NDJSON line of a streamed query response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamedRows {
    pub relevant_data: Vec<Row>,
}

/// Upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identifier for later queries
    pub file_id: String,
    /// Human-readable status
    pub message: String,
    /// First rows of the parsed file
    pub preview: Vec<Row>,
}

/// Stored file summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub file_id: String,
    pub file_name: String,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// File list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<FileSummary>,
}

/// Preview response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub preview: Vec<Row>,
}

/// Plain status message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
