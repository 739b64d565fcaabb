//! Query endpoint

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::convert::Infallible;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{
    query::QueryRequest,
    response::{QueryResponse, QueryResult, StreamedAnswer, StreamedRows},
};

/// POST /api/query - Answer a question about one uploaded file
///
/// The engine runs once either way; `stream` only changes how the result is
/// written out.
pub async fn query_csv(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Response> {
    let top_k = request
        .top_k
        .unwrap_or(state.config().retrieval.default_top_k);

    tracing::info!(
        "Query on {} (top_k={}, stream={}): \"{}\"",
        request.file_id,
        top_k,
        request.stream,
        request.query
    );

    let result = state.query(&request.file_id, &request.query, top_k).await?;

    if request.stream {
        ndjson_response(result)
    } else {
        Ok(Json(QueryResponse::from(result)).into_response())
    }
}

/// Two NDJSON lines: the answer, then the relevant rows
pub fn ndjson_lines(result: QueryResult) -> Result<Vec<String>> {
    let answer = serde_json::to_string(&StreamedAnswer {
        response: result.answer,
    })?;
    let rows = serde_json::to_string(&StreamedRows {
        relevant_data: result.relevant_rows,
    })?;
    Ok(vec![answer + "\n", rows + "\n"])
}

fn ndjson_response(result: QueryResult) -> Result<Response> {
    let lines = ndjson_lines(result)?;
    let stream = futures::stream::iter(lines.into_iter().map(Ok::<_, Infallible>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(stream))
        .map_err(|e| Error::internal(format!("Failed to build response: {}", e)))
}
