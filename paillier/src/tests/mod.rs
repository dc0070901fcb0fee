mod packing;

use sampling::source::Source;

use crate::{KeyGenerator, Paillier};

pub(crate) fn test_paillier(bits: u32, seed: u8) -> Paillier {
    let mut source: Source = Source::new([seed; 32]);
    Paillier::generate_with(&KeyGenerator::new(bits).with_primality_reps(25), &mut source).unwrap()
}
