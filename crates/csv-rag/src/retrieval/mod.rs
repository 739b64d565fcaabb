//! Row indexing, ranking, and the query engine

pub mod engine;
pub mod index;
pub mod ranker;

pub use engine::RagEngine;
pub use index::{render_row, DocumentIndex, IndexEntry};
pub use ranker::{dot_product, top_k, Ranked};
