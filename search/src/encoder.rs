use serde::{Deserialize, Serialize};
use utils::fnv1a;

use crate::BinaryVector;

pub const DEFAULT_FILTER_SIZE: usize = 500;
pub const DEFAULT_KMER_LENGTH: usize = 8;

/// Maps a raw record to a fixed-length [BinaryVector].
pub trait FeatureEncoder: Send + Sync {
    /// Length of every produced vector.
    fn len(&self) -> usize;

    fn encode(&self, record: &str) -> BinaryVector;
}

/// Bloom-filter encoding of the k-mers of a sequence: every window of
/// `k` consecutive symbols sets bit `fnv1a(window) mod size`.
///
/// Input is upper-cased and trimmed first, so `acgt` and `ACGT\n` encode
/// identically. A sequence shorter than `k` encodes to the zero vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmerBloomEncoder {
    size: usize,
    k: usize,
}

impl KmerBloomEncoder {
    /// # Panics
    /// If `size` or `k` is zero.
    pub fn new(size: usize, k: usize) -> Self {
        assert!(size > 0, "filter size must be positive");
        assert!(k > 0, "k-mer length must be positive");
        Self { size, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl Default for KmerBloomEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_SIZE, DEFAULT_KMER_LENGTH)
    }
}

impl FeatureEncoder for KmerBloomEncoder {
    fn len(&self) -> usize {
        self.size
    }

    fn encode(&self, record: &str) -> BinaryVector {
        let sequence: Vec<u8> = record.trim().bytes().map(|b| b.to_ascii_uppercase()).collect();
        let size: u64 = self.size as u64;
        BinaryVector::from_indices(
            self.size,
            sequence.windows(self.k).map(|kmer| (fnv1a(kmer) % size) as usize),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_insensitive() {
        let encoder: KmerBloomEncoder = KmerBloomEncoder::default();
        assert_eq!(encoder.encode("acgtacgtac\n"), encoder.encode("ACGTACGTAC"));
        assert_eq!(encoder.encode("ACGTACGTAC").len(), DEFAULT_FILTER_SIZE);
    }

    #[test]
    fn short_sequence_is_zero() {
        let encoder: KmerBloomEncoder = KmerBloomEncoder::new(64, 8);
        assert_eq!(encoder.encode("ACGTACG"), BinaryVector::zeros(64));
        assert_eq!(encoder.encode(""), BinaryVector::zeros(64));
    }

    #[test]
    fn one_bit_per_distinct_kmer() {
        let encoder: KmerBloomEncoder = KmerBloomEncoder::new(1 << 20, 3);
        // ACG CGT GTA TAC ACG: four distinct 3-mers
        let v: BinaryVector = encoder.encode("ACGTACG");
        assert!(v.magnitude() <= 4);
        assert!(v.get((fnv1a(b"ACG") % (1 << 20)) as usize));
        assert!(v.get((fnv1a(b"TAC") % (1 << 20)) as usize));
    }

    #[test]
    fn shared_prefix_overlaps() {
        let encoder: KmerBloomEncoder = KmerBloomEncoder::default();
        let a: BinaryVector = encoder.encode("ACGTTGCAACGTTGCA");
        let b: BinaryVector = encoder.encode("ACGTTGCAGGGGCCCC");
        assert!(a.intersection(&b) >= 1);
    }
}
