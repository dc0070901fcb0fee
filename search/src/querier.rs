use paillier::{Ciphertext, DecryptionMode, KeyGenerator, Packer, Paillier, PublicKey};
use rayon::prelude::*;
use rug::Integer;
use sampling::source::Source;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    BinaryVector, PackedEntry, PackedScores, Result, Score, ScoreRecord, ScoredEntry, SearchError,
};

/// Encrypted query bits together with the key they were encrypted under.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptedQuery {
    pub public_key: PublicKey,
    pub bits: Vec<Ciphertext>,
}

impl EncryptedQuery {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

/// Querier side of the protocol: owns the key pair, encrypts queries and
/// decrypts the scorer's responses.
pub struct Querier {
    paillier: Paillier,
    source: Source,
}

impl Querier {
    /// Fails with [paillier::Error::MissingPrivateKey] if `paillier`
    /// cannot decrypt.
    pub fn new(paillier: Paillier, source: Source) -> Result<Self> {
        if !paillier.can_decrypt() {
            return Err(paillier::Error::MissingPrivateKey.into());
        }
        Ok(Self { paillier, source })
    }

    pub fn generate(generator: &KeyGenerator, mut source: Source) -> Result<Self> {
        let paillier: Paillier = Paillier::generate_with(generator, &mut source)?;
        Self::new(paillier, source)
    }

    /// Generates a key pair from an OS-seeded [Source].
    pub fn from_os(generator: &KeyGenerator) -> Result<Self> {
        let source: Source =
            Source::from_os().map_err(|e| paillier::Error::Randomness(e.to_string()))?;
        Self::generate(generator, source)
    }

    pub fn paillier(&self) -> &Paillier {
        &self.paillier
    }

    pub fn public_key(&self) -> &PublicKey {
        self.paillier.public_key()
    }

    /// Encrypts every bit of `query` under a fresh blinding. Bits are
    /// encrypted in parallel, each from a source branched off the
    /// querier's.
    pub fn encrypt_query(&mut self, query: &BinaryVector) -> Result<EncryptedQuery> {
        let seeds: Vec<[u8; 32]> = (0..query.len()).map(|_| self.source.new_seed()).collect();
        let paillier: &Paillier = &self.paillier;
        let bits: Vec<Ciphertext> = seeds
            .into_par_iter()
            .enumerate()
            .map(|(i, seed)| {
                paillier.encrypt(&Integer::from(query.get(i) as u8), &mut Source::new(seed))
            })
            .collect::<paillier::Result<Vec<Ciphertext>>>()?;
        debug!(bits = bits.len(), "encrypted query");
        Ok(EncryptedQuery {
            public_key: self.public_key().clone(),
            bits,
        })
    }

    /// Decrypts one record per entry into its [Score].
    pub fn gather<P: Send>(
        &self,
        records: Vec<ScoreRecord<P>>,
        query_magnitude: u64,
    ) -> Result<Vec<ScoredEntry<P>>> {
        records
            .into_par_iter()
            .map(|r| -> Result<ScoredEntry<P>> {
                let value: Integer = self
                    .paillier
                    .decrypt_raw(&r.encrypted_intersection, DecryptionMode::Crt)?;
                let intersection: u64 =
                    check_intersection(r.id, value, query_magnitude, r.candidate_magnitude)?;
                Ok(ScoredEntry {
                    id: r.id,
                    score: Score::new(intersection, query_magnitude, r.candidate_magnitude),
                    payload: r.payload,
                })
            })
            .collect()
    }

    /// Unpacks a packed response into one [Score] per entry.
    pub fn gather_packed<P: Send>(
        &self,
        response: PackedScores<P>,
        query_magnitude: u64,
    ) -> Result<Vec<ScoredEntry<P>>> {
        let packer: Packer = Packer::new(&self.paillier, response.width)?;
        let count: usize = response.entries.len();
        if response.packets.len() != packer.packets(count) {
            return Err(SearchError::MalformedResponse {
                packets: response.packets.len(),
                entries: count,
            });
        }
        let values: Vec<Integer> = packer.unpack_all(&response.packets, count)?;
        response
            .entries
            .into_par_iter()
            .zip(values)
            .map(|(e, value): (PackedEntry<P>, Integer)| -> Result<ScoredEntry<P>> {
                let intersection: u64 =
                    check_intersection(e.id, value, query_magnitude, e.candidate_magnitude)?;
                Ok(ScoredEntry {
                    id: e.id,
                    score: Score::new(intersection, query_magnitude, e.candidate_magnitude),
                    payload: e.payload,
                })
            })
            .collect()
    }
}

fn check_intersection(id: u64, value: Integer, query_magnitude: u64, candidate_magnitude: u64) -> Result<u64> {
    let bound: u64 = query_magnitude.min(candidate_magnitude);
    match value.to_u64() {
        Some(v) if v <= bound => Ok(v),
        _ => Err(SearchError::InconsistentScore { id, value, bound }),
    }
}
