//! Per-file vector index

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::Row;

/// Render a row as `column:value` pairs in column order, separated by one space
pub fn render_row(row: &Row) -> String {
    row.iter()
        .map(|(column, value)| format!("{}:{}", column, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One indexed row
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Source row
    pub row: Row,
    /// Output of [`render_row`] for `row`
    pub rendered_text: String,
    /// Embedding of `rendered_text`
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    pub fn new(row: Row, rendered_text: String, embedding: Vec<f32>) -> Self {
        Self {
            row,
            rendered_text,
            embedding,
        }
    }
}

/// All indexed rows of one file, in upload order
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
}

impl DocumentIndex {
    /// Render and embed every row
    ///
    /// Embedding requests run `parallelism` at a time; entries keep row order. Any
    /// embedding failure aborts the build.
    pub async fn build(
        rows: Vec<Row>,
        embedder: &dyn EmbeddingProvider,
        parallelism: usize,
    ) -> Result<Self> {
        let dimensions = embedder.dimensions();
        let mut entries = Vec::with_capacity(rows.len());
        let total_batches = rows.len().div_ceil(parallelism.max(1));

        let mut rows = rows.into_iter().peekable();
        let mut batch_num = 0;
        while rows.peek().is_some() {
            batch_num += 1;
            let batch: Vec<Row> = rows.by_ref().take(parallelism.max(1)).collect();
            let texts: Vec<String> = batch.iter().map(render_row).collect();

            let embeddings = embedder.embed_batch(&texts).await?;
            if embeddings.len() != texts.len() {
                return Err(Error::embedding(format!(
                    "{} returned {} embeddings for {} texts",
                    embedder.name(),
                    embeddings.len(),
                    texts.len()
                )));
            }

            for ((row, text), embedding) in batch.into_iter().zip(texts).zip(embeddings) {
                if embedding.len() != dimensions {
                    return Err(Error::embedding(format!(
                        "Embedding for row {} has {} dimensions, expected {}",
                        entries.len(),
                        embedding.len(),
                        dimensions
                    )));
                }
                entries.push(IndexEntry::new(row, text, embedding));
            }

            tracing::debug!("Embedded batch {}/{}", batch_num, total_batches);
        }

        Ok(Self {
            entries,
            dimensions,
        })
    }

    /// Wrap pre-embedded entries, checking they share one dimensionality
    pub fn from_entries(entries: Vec<IndexEntry>) -> Result<Self> {
        let dimensions = entries.first().map_or(0, |e| e.embedding.len());
        if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dimensions) {
            return Err(Error::embedding(format!(
                "Mixed embedding sizes: {} and {}",
                dimensions,
                bad.embedding.len()
            )));
        }
        Ok(Self {
            entries,
            dimensions,
        })
    }

    /// Entries in upload order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Embedding dimensionality shared by all entries
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::HashingEmbedder;

    fn people() -> Vec<Row> {
        vec![
            Row::new().with("name", "Alice").with("age", "30"),
            Row::new().with("name", "Bob").with("age", "25"),
            Row::new().with("name", "Carol").with("age", "41"),
        ]
    }

    #[test]
    fn test_render_row() {
        let row = Row::new().with("name", "Alice").with("age", "30");
        assert_eq!(render_row(&row), "name:Alice age:30");
        assert_eq!(render_row(&row), render_row(&row.clone()));
        assert_eq!(render_row(&Row::new()), "");
    }

    #[test]
    fn test_render_follows_column_order() {
        let row = Row::new().with("age", "30").with("name", "Alice");
        assert_eq!(render_row(&row), "age:30 name:Alice");
    }

    #[tokio::test]
    async fn test_build_preserves_order_and_size() {
        let embedder = HashingEmbedder::new(32, 1000).unwrap();
        for parallelism in [1, 2, 8] {
            let index = DocumentIndex::build(people(), &embedder, parallelism)
                .await
                .unwrap();
            assert_eq!(index.len(), 3);
            assert_eq!(index.dimensions(), 32);
            let names: Vec<_> = index
                .entries()
                .iter()
                .map(|e| e.row.get("name").unwrap())
                .collect();
            assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
            assert_eq!(index.entries()[1].rendered_text, "name:Bob age:25");
        }
    }

    #[tokio::test]
    async fn test_build_empty() {
        let embedder = HashingEmbedder::new(8, 1000).unwrap();
        let index = DocumentIndex::build(Vec::new(), &embedder, 4).await.unwrap();
        assert!(index.is_empty());
    }

    /// Records batch sizes; drops the last vector when `short` is set
    struct BatchRecorder {
        batches: std::sync::Mutex<Vec<usize>>,
        short: bool,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for BatchRecorder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.batches.lock().unwrap().push(texts.len());
            let keep = if self.short { texts.len() - 1 } else { texts.len() };
            Ok(vec![vec![1.0, 0.0]; keep])
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "recorder"
        }
    }

    #[tokio::test]
    async fn test_build_embeds_in_bounded_batches() {
        let embedder = BatchRecorder {
            batches: Default::default(),
            short: false,
        };
        let index = DocumentIndex::build(people(), &embedder, 2).await.unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(*embedder.batches.lock().unwrap(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_build_rejects_short_batch_reply() {
        let embedder = BatchRecorder {
            batches: Default::default(),
            short: true,
        };
        let err = DocumentIndex::build(people(), &embedder, 3).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_from_entries_rejects_mixed_sizes() {
        let entries = vec![
            IndexEntry::new(Row::new(), String::new(), vec![1.0, 0.0]),
            IndexEntry::new(Row::new(), String::new(), vec![1.0]),
        ];
        assert!(matches!(
            DocumentIndex::from_entries(entries),
            Err(Error::Embedding(_))
        ));
    }
}
