
use paillier::KeyGenerator;
use rand::Rng;
use sampling::source::Source;

use crate::{BinaryVector, Corpus, Querier};

pub(crate) fn test_querier(bits: u32, seed: u8) -> Querier {
    Querier::generate(&KeyGenerator::new(bits).with_primality_reps(25), Source::new([seed; 32])).unwrap()
}

pub(crate) fn vector(bits: &[u8]) -> BinaryVector {
    bits.iter().map(|b| *b == 1).collect()
}

/// Corpus of `count` random vectors with ids 100, 101, ... and the entry
/// position as payload.
pub(crate) fn random_corpus(len: usize, count: usize, density: f64, source: &mut Source) -> Corpus<usize> {
    Corpus::from_entries(
        len,
        (0..count).map(|i| {
            let v: BinaryVector = (0..len).map(|_| source.random_bool(density)).collect();
            (100 + i as u64, v, i)
        }),
    )
    .unwrap()
}
