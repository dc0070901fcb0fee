use std::fmt;

use rug::Integer;
use sampling::source::Source;
use serde::{Deserialize, Serialize};

use crate::arith::pow_mod;
use crate::{Ciphertext, Error, KeyGenFailure, OperandRange, Result};

/// Public half of a key pair: the modulus n, the generator g = n + 1 and
/// the cached n^2.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyParts", into = "PublicKeyParts")]
pub struct PublicKey {
    pub(crate) n: Integer,
    pub(crate) g: Integer,
    pub(crate) n_squared: Integer,
    pub(crate) n_bits: u32,
}

/// Wire form of a [PublicKey]: the three integers exchanged with a remote scorer.
#[derive(Serialize, Deserialize)]
struct PublicKeyParts {
    n: Integer,
    g: Integer,
    n_squared: Integer,
}

impl From<PublicKey> for PublicKeyParts {
    fn from(pk: PublicKey) -> Self {
        Self {
            n: pk.n,
            g: pk.g,
            n_squared: pk.n_squared,
        }
    }
}

impl TryFrom<PublicKeyParts> for PublicKey {
    type Error = Error;

    fn try_from(parts: PublicKeyParts) -> Result<Self> {
        let pk: PublicKey = PublicKey::new(parts.n)?;
        if pk.g != parts.g {
            return Err(Error::InvalidPublicKey("g != n + 1"));
        }
        if pk.n_squared != parts.n_squared {
            return Err(Error::InvalidPublicKey("n_squared != n * n"));
        }
        Ok(pk)
    }
}

impl PublicKey {
    /// Builds the public key of modulus `n`, which must be an odd integer > 1.
    pub fn new(n: Integer) -> Result<Self> {
        if n <= 1 || n.is_even() {
            return Err(Error::InvalidPublicKey("n must be odd and greater than one"));
        }
        let g: Integer = Integer::from(&n + 1u32);
        let n_squared: Integer = Integer::from(n.square_ref());
        let n_bits: u32 = utils::bit_length(&n);
        Ok(Self { n, g, n_squared, n_bits })
    }

    pub fn n(&self) -> &Integer {
        &self.n
    }

    pub fn g(&self) -> &Integer {
        &self.g
    }

    pub fn n_squared(&self) -> &Integer {
        &self.n_squared
    }

    /// Bit length of the modulus n.
    pub fn bits(&self) -> u32 {
        self.n_bits
    }

    /// Largest admissible plaintext bit length: bitlength(n) - 1.
    pub fn max_plaintext_bits(&self) -> u32 {
        self.n_bits - 1
    }

    pub(crate) fn check_plaintext(&self, m: &Integer) -> Result<()> {
        let bits: u32 = utils::bit_length(m);
        if bits > self.max_plaintext_bits() {
            return Err(OperandRange::Plaintext {
                bits,
                max_bits: self.max_plaintext_bits(),
            }
            .into());
        }
        Ok(())
    }

    pub(crate) fn check_ciphertext(&self, c: &Ciphertext) -> Result<()> {
        if c.0 < 0 || c.0 >= self.n_squared {
            return Err(OperandRange::Ciphertext.into());
        }
        Ok(())
    }

    /// Reduces a signed plaintext into \[0, n).
    pub(crate) fn reduce(&self, m: &Integer) -> Integer {
        m.clone().rem_euc(&self.n)
    }
}

/// Precomputed blinding factor r^n mod n^2.
///
/// A [Blinding] is consumed by the encryption that uses it and cannot be
/// cloned, so one sampled value never blinds two ciphertexts.
pub struct Blinding(pub(crate) Integer);

impl Blinding {
    /// Samples a fresh unit r of Z/nZ and computes r^n mod n^2.
    pub fn sample(pk: &PublicKey, source: &mut Source) -> Result<Self> {
        let r: Integer = source
            .next_unit(&pk.n)
            .ok_or_else(|| Error::Randomness("no unit of Z/nZ found".to_string()))?;
        Ok(Self(pow_mod(&r, &pk.n, &pk.n_squared)))
    }

    /// Computes r^n mod n^2 for caller-provided randomness r, which must be a unit of Z/nZ.
    pub fn from_randomness(pk: &PublicKey, r: &Integer) -> Result<Self> {
        if *r <= 0 || *r >= pk.n || Integer::from(r.gcd_ref(&pk.n)) != 1 {
            return Err(OperandRange::Randomness.into());
        }
        Ok(Self(pow_mod(r, &pk.n, &pk.n_squared)))
    }
}

/// Private half of a key pair.
///
/// Holds the factorization of n and everything derived from it: the
/// Carmichael value lambda = (p-1)(q-1), mu = lambda^-1 mod n and the
/// CRT decryption constants.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub(crate) public: PublicKey,
    pub(crate) lambda: Integer,
    pub(crate) mu: Integer,
    pub(crate) p: Integer,
    pub(crate) q: Integer,
    pub(crate) p_squared: Integer,
    pub(crate) q_squared: Integer,
    pub(crate) phi_p_squared: Integer,
    pub(crate) phi_q_squared: Integer,
    pub(crate) q_squared_inv: Integer,
    pub(crate) lambda_mod_phi_p_squared: Integer,
    pub(crate) lambda_mod_phi_q_squared: Integer,
}

impl PrivateKey {
    /// Derives the full private key from the two prime factors of n.
    ///
    /// Fails with [KeyGenFailure::InvalidPrimes] if p == q, if either is
    /// even or smaller than 3, or if gcd(n, (p-1)(q-1)) != 1. Primality is
    /// not re-checked.
    pub fn from_primes(p: Integer, q: Integer) -> Result<Self> {
        if p == q || p < 3 || q < 3 || p.is_even() || q.is_even() {
            return Err(KeyGenFailure::InvalidPrimes.into());
        }

        let n: Integer = Integer::from(&p * &q);
        let lambda: Integer = Integer::from(&p - 1u32) * Integer::from(&q - 1u32);

        if Integer::from(n.gcd_ref(&lambda)) != 1 {
            return Err(KeyGenFailure::InvalidPrimes.into());
        }

        let mu: Integer = match lambda.invert_ref(&n) {
            Some(inv) => Integer::from(inv),
            None => return Err(KeyGenFailure::InvalidPrimes.into()),
        };

        let p_squared: Integer = Integer::from(p.square_ref());
        let q_squared: Integer = Integer::from(q.square_ref());
        let phi_p_squared: Integer = Integer::from(&p_squared - &p);
        let phi_q_squared: Integer = Integer::from(&q_squared - &q);

        let q_squared_inv: Integer = match q_squared.invert_ref(&p_squared) {
            Some(inv) => Integer::from(inv),
            None => return Err(KeyGenFailure::InvalidPrimes.into()),
        };

        let lambda_mod_phi_p_squared: Integer = Integer::from(&lambda % &phi_p_squared);
        let lambda_mod_phi_q_squared: Integer = Integer::from(&lambda % &phi_q_squared);

        Ok(Self {
            public: PublicKey::new(n)?,
            lambda,
            mu,
            p,
            q,
            p_squared,
            q_squared,
            phi_p_squared,
            phi_q_squared,
            q_squared_inv,
            lambda_mod_phi_p_squared,
            lambda_mod_phi_q_squared,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn n(&self) -> &Integer {
        &self.public.n
    }

    pub fn lambda(&self) -> &Integer {
        &self.lambda
    }

    pub fn mu(&self) -> &Integer {
        &self.mu
    }

    pub fn p(&self) -> &Integer {
        &self.p
    }

    pub fn q(&self) -> &Integer {
        &self.q
    }

    pub fn p_squared(&self) -> &Integer {
        &self.p_squared
    }

    pub fn q_squared(&self) -> &Integer {
        &self.q_squared
    }

    pub fn phi_p_squared(&self) -> &Integer {
        &self.phi_p_squared
    }

    pub fn phi_q_squared(&self) -> &Integer {
        &self.phi_q_squared
    }

    /// (q^2)^-1 mod p^2.
    pub fn q_squared_inv(&self) -> &Integer {
        &self.q_squared_inv
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("n", &self.public.n)
            .finish_non_exhaustive()
    }
}
