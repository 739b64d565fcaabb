//! Core types for the RAG system

pub mod file_record;
pub mod query;
pub mod response;
pub mod row;

pub use file_record::StoredFile;
pub use query::QueryRequest;
pub use response::QueryResult;
pub use row::Row;
