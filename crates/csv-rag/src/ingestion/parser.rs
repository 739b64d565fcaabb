//! CSV parsing into string-valued rows

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::types::row::{Row, NULL_CELL};

/// Cell contents treated as missing values
const NULL_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// A parsed CSV file
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// Header names in file order
    pub columns: Vec<String>,
    /// Every data row, missing cells replaced by `"NULL"`
    pub rows: Vec<Row>,
    /// First rows for display
    pub preview: Vec<Row>,
}

/// CSV parser
pub struct CsvParser;

impl CsvParser {
    /// Parse CSV bytes; the first record is the header
    pub fn parse(filename: &str, data: &[u8], preview_rows: usize) -> Result<ParsedCsv> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| Error::file_parse(filename, e.to_string()))?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();
        let columns = dedupe_columns(columns);

        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            return Err(Error::file_parse(filename, "Empty CSV file"));
        }

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| Error::file_parse(filename, e.to_string()))?;

            if record.len() > columns.len() {
                return Err(Error::file_parse(
                    filename,
                    format!(
                        "Row {} has {} fields, header has {}",
                        line + 1,
                        record.len(),
                        columns.len()
                    ),
                ));
            }

            let mut row = Row::with_capacity(columns.len());
            for (i, column) in columns.iter().enumerate() {
                row.insert(column.clone(), normalize_cell(record.get(i)));
            }
            rows.push(row);
        }

        let preview = rows.iter().take(preview_rows).cloned().collect();

        tracing::debug!(
            "Parsed {}: {} columns, {} rows",
            filename,
            columns.len(),
            rows.len()
        );

        Ok(ParsedCsv {
            columns,
            rows,
            preview,
        })
    }

    /// Read and parse a CSV from a server-local path
    pub async fn parse_path(path: &std::path::Path, preview_rows: usize) -> Result<ParsedCsv> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(Error::InvalidRequest(format!(
                "File path does not exist: {}",
                path.display()
            )));
        }

        let data = tokio::fs::read(path).await?;
        Self::parse(&filename, &data, preview_rows)
    }
}

/// Rename repeated headers to `name.1`, `name.2`, ... so every cell keeps its own column
fn dedupe_columns(columns: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut unique = Vec::with_capacity(columns.len());

    for column in columns {
        let mut name = column.clone();
        while taken.contains(&name) {
            let n = suffixes.entry(column.clone()).or_insert(0);
            *n += 1;
            name = format!("{}.{}", column, n);
        }
        if name != column {
            tracing::debug!("Renamed duplicate column '{}' to '{}'", column, name);
        }
        taken.insert(name.clone());
        unique.push(name);
    }
    unique
}

fn normalize_cell(cell: Option<&str>) -> String {
    match cell {
        Some(v) if !is_missing(v) => v.to_string(),
        _ => NULL_CELL.to_string(),
    }
}

/// Exact match only; whitespace-only cells are kept as text
fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NULL_MARKERS.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let parsed = CsvParser::parse("people.csv", b"name,age\nAlice,30\nBob,25\n", 5).unwrap();

        assert_eq!(parsed.columns, vec!["name", "age"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0], Row::new().with("name", "Alice").with("age", "30"));
        assert_eq!(parsed.preview.len(), 2);
    }

    #[test]
    fn test_missing_values_become_null() {
        let parsed = CsvParser::parse("a.csv", b"a,b,c\n1,,NA\n2\n", 5).unwrap();

        assert_eq!(parsed.rows[0].get("b"), Some("NULL"));
        assert_eq!(parsed.rows[0].get("c"), Some("NULL"));
        assert_eq!(parsed.rows[1].get("b"), Some("NULL"));
        assert_eq!(parsed.rows[1].len(), 3);
    }

    #[test]
    fn test_whitespace_cell_kept() {
        let parsed = CsvParser::parse("a.csv", b"a,b\n1, \n", 5).unwrap();
        assert_eq!(parsed.rows[0].get("b"), Some(" "));
    }

    #[test]
    fn test_duplicate_headers_renamed() {
        let parsed = CsvParser::parse("dup.csv", b"a,a,b,a\n1,2,3,4\n", 5).unwrap();

        assert_eq!(parsed.columns, vec!["a", "a.1", "b", "a.2"]);
        let row = &parsed.rows[0];
        assert_eq!(row.len(), parsed.columns.len());
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("a.1"), Some("2"));
        assert_eq!(row.get("a.2"), Some("4"));
    }

    #[test]
    fn test_duplicate_rename_skips_existing_name() {
        let parsed = CsvParser::parse("dup.csv", b"a,a.1,a\nx,y,z\n", 5).unwrap();

        assert_eq!(parsed.columns, vec!["a", "a.1", "a.2"]);
        assert_eq!(parsed.rows[0].get("a.2"), Some("z"));
    }

    #[test]
    fn test_quoted_values_kept() {
        let parsed = CsvParser::parse("a.csv", b"city,note\n\"Paris, FR\",\" hi \"\n", 5).unwrap();
        assert_eq!(parsed.rows[0].get("city"), Some("Paris, FR"));
        assert_eq!(parsed.rows[0].get("note"), Some(" hi "));
    }

    #[test]
    fn test_bom_stripped() {
        let parsed = CsvParser::parse("a.csv", "\u{feff}id,v\n1,2\n".as_bytes(), 5).unwrap();
        assert_eq!(parsed.columns[0], "id");
    }

    #[test]
    fn test_empty_file_rejected() {
        let err = CsvParser::parse("empty.csv", b"", 5).unwrap_err();
        assert!(matches!(err, Error::FileParse { ref message, .. } if message == "Empty CSV file"));
    }

    #[test]
    fn test_long_row_rejected() {
        let err = CsvParser::parse("a.csv", b"a,b\n1,2,3\n", 5).unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_preview_limited() {
        let parsed = CsvParser::parse("a.csv", b"n\n1\n2\n3\n", 2).unwrap();
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.preview.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_path() {
        let err = CsvParser::parse_path(std::path::Path::new("/nonexistent/x.csv"), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
