use thiserror::Error;

/// Errors of the cryptosystem.
///
/// Precondition violations are always reported, never silently reduced
/// modulo n or n^2.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("key generation failed: {0}")]
    KeyGenerationFailure(#[from] KeyGenFailure),

    #[error("invalid operand range: {0}")]
    InvalidOperandRange(#[from] OperandRange),

    #[error("decryption requires the private key")]
    MissingPrivateKey,

    #[error("packing width {width} does not fit a {modulus_bits}-bit modulus")]
    PackingWidthMismatch { width: u32, modulus_bits: u32 },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(&'static str),

    #[error("randomness failure: {0}")]
    Randomness(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyGenFailure {
    #[error("{bits}-bit modulus is degenerate, at least {min_bits} bits are required")]
    DegenerateBitLength { bits: u32, min_bits: u32 },

    #[error("no {bits}-bit prime found after {trials} candidates")]
    PrimeSearchExhausted { bits: u32, trials: usize },

    #[error("no valid {bits}-bit modulus after {attempts} prime pairs")]
    ModulusExhausted { bits: u32, attempts: usize },

    #[error("primes do not form a valid modulus (equal, or gcd(n, (p-1)(q-1)) != 1)")]
    InvalidPrimes,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperandRange {
    #[error("plaintext has {bits} bits, at most {max_bits} allowed")]
    Plaintext { bits: u32, max_bits: u32 },

    #[error("ciphertext is outside [0, n^2)")]
    Ciphertext,

    #[error("randomness is not a unit of Z/nZ")]
    Randomness,
}

pub type Result<T> = std::result::Result<T, Error>;
