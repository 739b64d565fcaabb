//! Query request types

use serde::{Deserialize, Serialize};

/// Query request for a single uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Identifier returned by the upload endpoint
    pub file_id: String,

    /// The question to answer
    pub query: String,

    /// Number of rows to retrieve (server default when absent)
    #[serde(default)]
    pub top_k: Option<usize>,

    /// Deliver the result as two NDJSON lines instead of one JSON body
    #[serde(default)]
    pub stream: bool,
}

/// Query parameters for the preview endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewParams {
    /// Number of rows to return
    pub rows: Option<usize>,
}
