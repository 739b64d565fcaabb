//! Dot-product ranking over a document index

use std::cmp::Ordering;

use super::index::{DocumentIndex, IndexEntry};

/// A scored index entry
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    /// Raw dot product with the query vector
    pub score: f32,
    pub entry: &'a IndexEntry,
}

/// Raw dot product; embeddings are not normalized, so this is not cosine similarity
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Score every entry against `query` and keep the `k` best
///
/// Output is sorted by descending score. The sort is stable, so equal scores keep
/// upload order. NaN scores rank below everything else.
pub fn top_k<'a>(index: &'a DocumentIndex, query: &[f32], k: usize) -> Vec<Ranked<'a>> {
    let mut scored: Vec<Ranked<'a>> = index
        .entries()
        .iter()
        .map(|entry| Ranked {
            score: dot_product(query, &entry.embedding),
            entry,
        })
        .collect();

    scored.sort_by(|a, b| descending(a.score, b.score));
    scored.truncate(k);
    scored
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
