use utils::Map;

use crate::{BinaryVector, FeatureEncoder, Result, SearchError};

/// A corpus entry: its identifier, its encoded vector and a caller payload
/// returned alongside the entry's score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusEntry<P> {
    pub id: u64,
    pub vector: BinaryVector,
    pub payload: P,
}

/// Ordered collection of entries sharing one vector length. Entry order
/// is the scan order, which drives tie-breaking in the ranking.
#[derive(Clone, Debug)]
pub struct Corpus<P> {
    vector_len: usize,
    entries: Vec<CorpusEntry<P>>,
    index: Map<u64, usize>,
}

impl<P> Corpus<P> {
    pub fn new(vector_len: usize) -> Self {
        Self {
            vector_len,
            entries: Vec::new(),
            index: Map::new(),
        }
    }

    pub fn from_entries<I>(vector_len: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, BinaryVector, P)>,
    {
        let mut corpus: Corpus<P> = Self::new(vector_len);
        for (id, vector, payload) in entries {
            corpus.push(id, vector, payload)?;
        }
        Ok(corpus)
    }

    /// Encodes every `(id, record, payload)` with `encoder`.
    pub fn encode<'r, E, I>(encoder: &E, records: I) -> Result<Self>
    where
        E: FeatureEncoder,
        I: IntoIterator<Item = (u64, &'r str, P)>,
    {
        Self::from_entries(
            encoder.len(),
            records
                .into_iter()
                .map(|(id, record, payload)| (id, encoder.encode(record), payload)),
        )
    }

    pub fn push(&mut self, id: u64, vector: BinaryVector, payload: P) -> Result<()> {
        if vector.len() != self.vector_len {
            return Err(SearchError::VectorLengthMismatch {
                expected: self.vector_len,
                actual: vector.len(),
            });
        }
        if self.index.contains_key(&id) {
            return Err(SearchError::DuplicateIdentifier(id));
        }
        self.index.insert(id, self.entries.len());
        self.entries.push(CorpusEntry { id, vector, payload });
        Ok(())
    }

    pub fn vector_len(&self) -> usize {
        self.vector_len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&CorpusEntry<P>> {
        self.index.get(&id).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[CorpusEntry<P>] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CorpusEntry<P>> {
        self.entries.iter()
    }
}
