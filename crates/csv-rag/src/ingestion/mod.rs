//! File ingestion

pub mod parser;

pub use parser::{CsvParser, ParsedCsv};
