//! API routes for the RAG server

pub mod files;
pub mod query;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(files::upload_csv).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/files", get(files::list_files))
        .route("/files/:id", delete(files::delete_file))
        .route("/files/:id/preview", get(files::get_preview))
        .route("/query", post(query::query_csv))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "csv-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Question answering over uploaded CSV files",
        "endpoints": {
            "POST /api/upload": "Upload a CSV (multipart field 'file' or 'file_path')",
            "GET /api/files": "List uploaded files",
            "GET /api/files/:id/preview": "First rows of a file (?rows=N)",
            "DELETE /api/files/:id": "Delete a file and its index",
            "POST /api/query": "Ask a question about a file (stream=true for NDJSON)"
        }
    }))
}
