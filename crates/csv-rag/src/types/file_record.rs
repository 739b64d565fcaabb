//! Uploaded file records held by the service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::response::FileSummary;
use super::row::Row;

/// One uploaded CSV and its parsed rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    /// Opaque identifier handed to clients
    pub file_id: String,
    /// Original filename
    pub file_name: String,
    /// Header names in file order
    pub columns: Vec<String>,
    /// Parsed rows
    pub rows: Vec<Row>,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

impl StoredFile {
    /// Create a record with a fresh identifier
    pub fn new(file_name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            file_id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            columns,
            rows,
            uploaded_at: Utc::now(),
        }
    }

    /// First `n` rows
    pub fn preview(&self, n: usize) -> Vec<Row> {
        self.rows.iter().take(n).cloned().collect()
    }
}

impl From<&StoredFile> for FileSummary {
    fn from(file: &StoredFile) -> Self {
        Self {
            file_id: file.file_id.clone(),
            file_name: file.file_name.clone(),
            row_count: file.rows.len(),
            columns: file.columns.clone(),
            uploaded_at: file.uploaded_at,
        }
    }
}
