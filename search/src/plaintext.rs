//! Cleartext reference scoring, computing the same ranking as the
//! encrypted protocol without any cryptography.

use crate::{BinaryVector, Corpus, Ranking, Result, Score, ScoredEntry, SearchError, TieBreak, rank};

pub fn score<P: Clone>(corpus: &Corpus<P>, query: &BinaryVector) -> Result<Vec<ScoredEntry<P>>> {
    if query.len() != corpus.vector_len() {
        return Err(SearchError::VectorLengthMismatch {
            expected: corpus.vector_len(),
            actual: query.len(),
        });
    }
    Ok(corpus
        .iter()
        .map(|entry| ScoredEntry {
            id: entry.id,
            score: Score::new(
                entry.vector.intersection(query) as u64,
                query.magnitude() as u64,
                entry.vector.magnitude() as u64,
            ),
            payload: entry.payload.clone(),
        })
        .collect())
}

pub fn search<P: Clone>(
    corpus: &Corpus<P>,
    query: &BinaryVector,
    top_k: usize,
    tie_break: TieBreak,
) -> Result<Ranking<P>> {
    Ok(rank(score(corpus, query)?, top_k, tie_break))
}
