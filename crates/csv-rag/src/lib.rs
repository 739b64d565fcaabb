//! csv-rag: question answering over uploaded CSV files
//!
//! Rows of an uploaded CSV are rendered to text, embedded, and kept in a per-file
//! in-memory index. Questions are answered by ranking rows against the embedded
//! question, assembling the best rows into a context block, and handing the prompt
//! to an LLM.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use retrieval::{DocumentIndex, IndexEntry, RagEngine};
pub use types::{
    query::QueryRequest,
    response::QueryResult,
    row::Row,
};
