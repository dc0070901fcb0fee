use rug::Integer;
use rug::integer::IsPrime;
use sampling::source::Source;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, KeyGenFailure, PrivateKey, PublicKey, Result};

/// Requested bit lengths below this value are clamped up to it.
pub const MIN_BIT_LENGTH: u32 = 3;

/// Smallest admissible bit length of a prime factor. A modulus whose
/// smaller factor would be shorter is rejected as degenerate.
pub const MIN_FACTOR_BITS: u32 = 4;

/// Candidate budget of the prime search, per bit of the prime
/// (per squared bit for safe primes).
pub const PRIME_TRIALS_PER_BIT: usize = 100;

/// Number of prime pairs drawn before giving up on assembling a modulus.
pub const MAX_MODULUS_ATTEMPTS: usize = 64;

/// Miller-Rabin repetitions of the primality test.
pub const DEFAULT_PRIMALITY_REPS: u32 = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimeStrategy {
    /// Uniformly random primes.
    #[default]
    Random,
    /// Safe primes p = 2p' + 1 with p' prime.
    Safe,
}

/// Produces key pairs whose modulus n = p * q has exactly the requested
/// bit length.
///
/// p gets ceil(b/2) bits and q gets floor(b/2) bits, both with their two
/// most significant bits set. Requested lengths below [MIN_BIT_LENGTH]
/// are clamped up (and logged), lengths leaving a factor shorter than
/// [MIN_FACTOR_BITS] fail with [KeyGenFailure::DegenerateBitLength].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenerator {
    pub bit_length: u32,
    #[serde(default)]
    pub strategy: PrimeStrategy,
    #[serde(default = "default_primality_reps")]
    pub primality_reps: u32,
}

fn default_primality_reps() -> u32 {
    DEFAULT_PRIMALITY_REPS
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(2048)
    }
}

impl KeyGenerator {
    pub fn new(bit_length: u32) -> Self {
        Self {
            bit_length,
            strategy: PrimeStrategy::Random,
            primality_reps: DEFAULT_PRIMALITY_REPS,
        }
    }

    pub fn with_strategy(mut self, strategy: PrimeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_primality_reps(mut self, reps: u32) -> Self {
        self.primality_reps = reps;
        self
    }

    /// Bit length of the generated modulus, after clamping.
    pub fn effective_bit_length(&self) -> u32 {
        self.bit_length.max(MIN_BIT_LENGTH)
    }

    /// Generates a key pair.
    ///
    /// # Arguments
    ///
    /// * `source`: randomness of the prime search, must be a cryptographically seeded [Source].
    pub fn generate(&self, source: &mut Source) -> Result<(PublicKey, PrivateKey)> {
        let bits: u32 = self.effective_bit_length();
        if bits != self.bit_length {
            warn!(
                requested = self.bit_length,
                clamped = bits,
                "key bit length clamped"
            );
        }

        let p_bits: u32 = bits.div_ceil(2);
        let q_bits: u32 = bits / 2;

        if q_bits < MIN_FACTOR_BITS {
            return Err(KeyGenFailure::DegenerateBitLength {
                bits,
                min_bits: 2 * MIN_FACTOR_BITS,
            }
            .into());
        }

        for attempt in 0..MAX_MODULUS_ATTEMPTS {
            let p: Integer = self.prime(p_bits, source)?;
            let q: Integer = self.prime(q_bits, source)?;
            match PrivateKey::from_primes(p, q) {
                Ok(sk) => {
                    debug!(bits, attempt, strategy = ?self.strategy, "key pair generated");
                    return Ok((sk.public_key().clone(), sk));
                }
                Err(Error::KeyGenerationFailure(KeyGenFailure::InvalidPrimes)) => {
                    debug!(bits, attempt, "prime pair rejected, redrawing");
                }
                Err(err) => return Err(err),
            }
        }

        Err(KeyGenFailure::ModulusExhausted {
            bits,
            attempts: MAX_MODULUS_ATTEMPTS,
        }
        .into())
    }

    fn prime(&self, bits: u32, source: &mut Source) -> Result<Integer> {
        match self.strategy {
            PrimeStrategy::Random => random_prime(bits, self.primality_reps, source),
            PrimeStrategy::Safe => safe_prime(bits, self.primality_reps, source),
        }
    }
}

/// Draws odd `bits`-bit candidates (two top bits set) until one passes
/// the primality test.
pub fn random_prime(bits: u32, reps: u32, source: &mut Source) -> Result<Integer> {
    let trials: usize = PRIME_TRIALS_PER_BIT * bits as usize;
    for _ in 0..trials {
        let candidate: Integer = source.next_odd_integer(bits);
        if candidate.is_probably_prime(reps) != IsPrime::No {
            return Ok(candidate);
        }
    }
    Err(KeyGenFailure::PrimeSearchExhausted { bits, trials }.into())
}

/// Draws a `bits`-bit safe prime p = 2p' + 1, p' prime, with the two top
/// bits of p set.
pub fn safe_prime(bits: u32, reps: u32, source: &mut Source) -> Result<Integer> {
    let trials: usize = PRIME_TRIALS_PER_BIT * (bits as usize) * (bits as usize);
    for _ in 0..trials {
        let sophie_germain: Integer = source.next_odd_integer(bits - 1);
        let candidate: Integer = Integer::from(&sophie_germain << 1u32) + 1u32;
        if sophie_germain.is_probably_prime(reps) != IsPrime::No && candidate.is_probably_prime(reps) != IsPrime::No {
            return Ok(candidate);
        }
    }
    Err(KeyGenFailure::PrimeSearchExhausted { bits, trials }.into())
}
