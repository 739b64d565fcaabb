//! Upload and file management endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use std::path::PathBuf;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::ingestion::CsvParser;
use crate::server::state::AppState;
use crate::types::{
    query::PreviewParams,
    response::{FileListResponse, FileSummary, MessageResponse, PreviewResponse, UploadResponse},
};

/// POST /api/upload - Upload a CSV, store it, and index its rows
///
/// Accepts either a `file` part with the CSV bytes or a `file_path` text part
/// naming a file readable by the server.
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();
    let preview_rows = state.config().retrieval.preview_rows;

    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut file_path: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload.csv".to_string());
                let data = field.bytes().await.map_err(|e| {
                    Error::InvalidRequest(format!("Failed to read file: {}", e))
                })?;
                upload = Some((filename, data.to_vec()));
            }
            "file_path" => {
                let text = field.text().await.map_err(|e| {
                    Error::InvalidRequest(format!("Failed to read file_path: {}", e))
                })?;
                if !text.trim().is_empty() {
                    file_path = Some(text.trim().to_string());
                }
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let (file_name, parsed) = match (upload, file_path) {
        (Some((filename, data)), _) => {
            tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());
            let parsed = CsvParser::parse(&filename, &data, preview_rows)?;
            (filename, parsed)
        }
        (None, Some(path)) => {
            tracing::info!("Processing server-local file: {}", path);
            let path = PathBuf::from(path);
            let parsed = CsvParser::parse_path(&path, preview_rows).await?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            (filename, parsed)
        }
        (None, None) => {
            return Err(Error::InvalidRequest(
                "Either file or file_path must be provided".to_string(),
            ))
        }
    };

    let preview = parsed.preview.clone();
    let file = state.ingest(&file_name, parsed).await?;

    tracing::info!(
        "Upload of {} completed in {}ms",
        file_name,
        start.elapsed().as_millis()
    );

    Ok(Json(UploadResponse {
        file_id: file.file_id,
        message: "Upload successful".to_string(),
        preview,
    }))
}

/// GET /api/files - List uploaded files
pub async fn list_files(State(state): State<AppState>) -> Json<FileListResponse> {
    let files = state.list_files().iter().map(FileSummary::from).collect();
    Json(FileListResponse { files })
}

/// GET /api/files/:id/preview - First rows of a file
pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PreviewParams>,
) -> Result<Json<PreviewResponse>> {
    let file = state
        .get_file(&id)
        .ok_or_else(|| Error::FileNotFound(id.clone()))?;
    let rows = params
        .rows
        .unwrap_or(state.config().retrieval.preview_rows);

    Ok(Json(PreviewResponse {
        preview: file.preview(rows),
    }))
}

/// DELETE /api/files/:id - Delete a file and evict its index
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.delete_file(&id)?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
