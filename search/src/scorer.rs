use paillier::{Ciphertext, Packer, Paillier};
use rayon::prelude::*;
use sampling::source::Source;
use tracing::debug;
use utils::bit_length_u64;

use crate::{
    Corpus, CorpusEntry, EncryptedQuery, PackedEntry, PackedScores, Result, ScoreRecord, SearchError,
};

/// Scorer side of the protocol: holds the corpus in the clear and sees
/// only the public key and the encrypted query bits.
///
/// For every entry the encrypted intersection is the homomorphic sum of
/// the query ciphertexts at the entry's set positions. Entries are
/// scored independently and in parallel, on the rayon pool the caller
/// installs (the global pool otherwise).
pub struct Scorer<'a, P> {
    corpus: &'a Corpus<P>,
    rerandomize: bool,
}

impl<'a, P> Scorer<'a, P>
where
    P: Clone + Send + Sync,
{
    pub fn new(corpus: &'a Corpus<P>) -> Self {
        Self {
            corpus,
            rerandomize: true,
        }
    }

    /// Whether returned ciphertexts are blinded with a fresh encryption
    /// of zero, hiding which query ciphertexts were summed.
    pub fn with_rerandomize(mut self, rerandomize: bool) -> Self {
        self.rerandomize = rerandomize;
        self
    }

    pub fn corpus(&self) -> &Corpus<P> {
        self.corpus
    }

    /// Width of a packed intersection: intersections never exceed the
    /// vector length, the extra bit keeps a full packet below n.
    pub fn packing_width(&self) -> u32 {
        bit_length_u64(self.corpus.vector_len() as u64) + 1
    }

    /// Returns one record per entry, in corpus order.
    ///
    /// # Arguments
    ///
    /// * `query`: encrypted query bits and the key they were encrypted under.
    /// * `source`: randomness for rerandomization, branched once per entry.
    pub fn score(&self, query: &EncryptedQuery, source: &mut Source) -> Result<Vec<ScoreRecord<P>>> {
        let paillier: Paillier = self.check(query)?;
        let intersections: Vec<Ciphertext> = self.intersections(&paillier, query)?;
        let intersections: Vec<Ciphertext> = self.blind(&paillier, intersections, source)?;
        Ok(self
            .corpus
            .iter()
            .zip(intersections)
            .map(|(entry, encrypted_intersection)| ScoreRecord {
                id: entry.id,
                encrypted_intersection,
                candidate_magnitude: entry.vector.magnitude() as u64,
                payload: entry.payload.clone(),
            })
            .collect())
    }

    /// Same as [Scorer::score] but packs the intersections into as few
    /// ciphertexts as the key allows, blinding the packets instead of
    /// the individual intersections.
    pub fn score_packed(&self, query: &EncryptedQuery, source: &mut Source) -> Result<PackedScores<P>> {
        let paillier: Paillier = self.check(query)?;
        let packer: Packer = Packer::new(&paillier, self.packing_width())?;
        let intersections: Vec<Ciphertext> = self.intersections(&paillier, query)?;
        let packets: Vec<Ciphertext> = packer.pack(&intersections)?;
        debug!(
            entries = intersections.len(),
            packets = packets.len(),
            width = packer.width(),
            "packed intersections"
        );
        let packets: Vec<Ciphertext> = self.blind(&paillier, packets, source)?;
        Ok(PackedScores {
            width: packer.width(),
            packets,
            entries: self
                .corpus
                .iter()
                .map(|entry| PackedEntry {
                    id: entry.id,
                    candidate_magnitude: entry.vector.magnitude() as u64,
                    payload: entry.payload.clone(),
                })
                .collect(),
        })
    }

    fn check(&self, query: &EncryptedQuery) -> Result<Paillier> {
        if query.len() != self.corpus.vector_len() {
            return Err(SearchError::VectorLengthMismatch {
                expected: self.corpus.vector_len(),
                actual: query.len(),
            });
        }
        Ok(Paillier::from_public_key(query.public_key.clone()))
    }

    fn intersections(&self, paillier: &Paillier, query: &EncryptedQuery) -> Result<Vec<Ciphertext>> {
        Ok(self
            .corpus
            .entries()
            .par_iter()
            .map(|entry: &CorpusEntry<P>| paillier.sum(entry.vector.ones().map(|i| &query.bits[i])))
            .collect::<paillier::Result<Vec<Ciphertext>>>()?)
    }

    fn blind(&self, paillier: &Paillier, cts: Vec<Ciphertext>, source: &mut Source) -> Result<Vec<Ciphertext>> {
        if !self.rerandomize {
            return Ok(cts);
        }
        let seeds: Vec<[u8; 32]> = cts.iter().map(|_| source.new_seed()).collect();
        Ok(cts
            .into_par_iter()
            .zip(seeds)
            .map(|(ct, seed)| paillier.rerandomize(&ct, &mut Source::new(seed)))
            .collect::<paillier::Result<Vec<Ciphertext>>>()?)
    }
}
