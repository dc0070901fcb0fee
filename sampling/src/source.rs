use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, OsError, OsRng, RngCore, SeedableRng, TryRngCore};
use rug::integer::Order;
use rug::Integer;

/// Upper bound on the number of candidates drawn by [Source::next_unit]
/// before giving up. For any modulus with large prime factors a single
/// draw almost always succeeds.
pub const MAX_UNIT_TRIALS: usize = 1 << 10;

/// Seeded cryptographically secure randomness.
///
/// Every randomized operation of the workspace (prime search, blinding
/// values, re-randomization) takes a `&mut Source`. Independent tasks
/// obtain their own stream through [Source::branch].
pub struct Source {
    source: ChaCha20Rng,
}

/// Draws a fresh 32 bytes seed from the operating system.
pub fn new_seed() -> Result<[u8; 32], OsError> {
    let mut seed: [u8; 32] = [0u8; 32];
    OsRng.try_fill_bytes(&mut seed)?;
    Ok(seed)
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha20Rng::from_seed(seed),
        }
    }

    /// Instantiates a [Source] seeded by the operating system.
    pub fn from_os() -> Result<Source, OsError> {
        Ok(Source::new(new_seed()?))
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.source.fill_bytes(&mut seed);
        seed
    }

    /// Returns an independent child [Source] seeded from this one.
    pub fn branch(&mut self) -> Self {
        Source::new(self.new_seed())
    }

    /// Samples an integer uniformly in \[0, 2^bits).
    pub fn next_integer_bits(&mut self, bits: u32) -> Integer {
        if bits == 0 {
            return Integer::new();
        }
        let nbytes: usize = bits.div_ceil(8) as usize;
        let mut bytes: Vec<u8> = vec![0u8; nbytes];
        self.source.fill_bytes(&mut bytes);
        let excess: u32 = (nbytes as u32) * 8 - bits;
        bytes[0] &= 0xFFu8 >> excess;
        Integer::from_digits(&bytes, Order::Msf)
    }

    /// Samples an integer uniformly in \[0, bound) by rejection.
    ///
    /// # Arguments
    ///
    /// * `bound`: exclusive upper bound, must be positive.
    pub fn next_integer_below(&mut self, bound: &Integer) -> Integer {
        debug_assert!(*bound > 0, "invalid bound: {} <= 0", bound);
        let bits: u32 = bound.significant_bits();
        loop {
            let x: Integer = self.next_integer_bits(bits);
            if x < *bound {
                return x;
            }
        }
    }

    /// Samples an odd integer of exactly `bits` bits whose two most
    /// significant bits are set.
    ///
    /// The product of two such integers of `a` and `b` bits always has
    /// exactly `a + b` bits.
    pub fn next_odd_integer(&mut self, bits: u32) -> Integer {
        debug_assert!(bits >= 2, "invalid bits: {} < 2", bits);
        let mut x: Integer = self.next_integer_bits(bits);
        x.set_bit(bits - 1, true);
        x.set_bit(bits - 2, true);
        x.set_bit(0, true);
        x
    }

    /// Samples a uniform element of the multiplicative group of Z/nZ,
    /// i.e. r in \[1, n) with gcd(r, n) = 1.
    ///
    /// Returns [None] if no unit was found after [MAX_UNIT_TRIALS] draws.
    pub fn next_unit(&mut self, n: &Integer) -> Option<Integer> {
        for _ in 0..MAX_UNIT_TRIALS {
            let r: Integer = self.next_integer_below(n);
            if r != 0 && Integer::from(r.gcd_ref(n)) == 1 {
                return Some(r);
            }
        }
        None
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

impl CryptoRng for Source {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Source = Source::new([7u8; 32]);
        let mut b: Source = Source::new([7u8; 32]);
        (0..16).for_each(|_| assert_eq!(a.next_u64(), b.next_u64()));
    }

    #[test]
    fn branches_are_independent() {
        let mut source: Source = Source::new([0u8; 32]);
        let mut a: Source = source.branch();
        let mut b: Source = source.branch();
        assert_ne!(a.new_seed(), b.new_seed());
    }

    #[test]
    fn integer_bits_bounded() {
        let mut source: Source = Source::new([1u8; 32]);
        [1u32, 7, 8, 9, 63, 64, 65, 257].iter().for_each(|&bits| {
            (0..32).for_each(|_| {
                let x: Integer = source.next_integer_bits(bits);
                assert!(x.significant_bits() <= bits, "bits={} x={}", bits, x);
                assert!(x >= 0);
            });
        });
        assert_eq!(source.next_integer_bits(0), 0);
    }

    #[test]
    fn integer_below_bound() {
        let mut source: Source = Source::new([2u8; 32]);
        let bound: Integer = Integer::from(1000);
        (0..256).for_each(|_| {
            let x: Integer = source.next_integer_below(&bound);
            assert!(x >= 0 && x < bound);
        });
    }

    #[test]
    fn odd_integer_shape() {
        let mut source: Source = Source::new([3u8; 32]);
        [2u32, 3, 16, 33, 128].iter().for_each(|&bits| {
            let x: Integer = source.next_odd_integer(bits);
            assert_eq!(x.significant_bits(), bits);
            assert!(x.is_odd());
            assert!(x.get_bit(bits - 2));
        });
    }

    #[test]
    fn unit_is_coprime() {
        let mut source: Source = Source::new([4u8; 32]);
        // 3 * 5 * 7
        let n: Integer = Integer::from(105);
        (0..64).for_each(|_| {
            let r: Integer = source.next_unit(&n).unwrap();
            assert!(r > 0 && r < n);
            assert_eq!(Integer::from(r.gcd_ref(&n)), 1);
        });
    }

    #[test]
    fn unit_of_one_does_not_exist() {
        let mut source: Source = Source::new([5u8; 32]);
        assert!(source.next_unit(&Integer::from(1)).is_none());
    }

    #[test]
    fn composes_with_rand() {
        let mut source: Source = Source::new([6u8; 32]);
        (0..64).for_each(|_| {
            let x: i64 = source.random_range(-10..10);
            assert!((-10..10).contains(&x));
        });
    }
}
