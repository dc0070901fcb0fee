use rug::Integer;
use sampling::source::Source;

use crate::arith::{center, l_function, pow_mod, secure_pow_mod};
use crate::{Blinding, Ciphertext, Error, KeyGenerator, PrivateKey, PublicKey, Result};

/// Selects how c^lambda mod n^2 is evaluated during decryption.
///
/// Both modes return identical plaintexts for every valid ciphertext.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecryptionMode {
    /// Two half-size exponentiations mod p^2 and q^2, recombined with the CRT.
    #[default]
    Crt,
    /// One exponentiation mod n^2.
    Standard,
}

/// The additively homomorphic cryptosystem, bound to a key.
///
/// An instance built from a [PublicKey] only can encrypt and evaluate
/// homomorphic operations, but every decryption returns
/// [Error::MissingPrivateKey].
///
/// Notation: upper-case operands (`a`, `b` of type [Ciphertext]) live in
/// Z/n^2Z, plaintexts and scalars ([Integer]) in Z/nZ.
#[derive(Clone, Debug)]
pub struct Paillier {
    public: PublicKey,
    private: Option<PrivateKey>,
}

impl Paillier {
    /// Generates a fresh key pair of `bit_length` bits.
    pub fn generate(bit_length: u32, source: &mut Source) -> Result<Self> {
        Self::generate_with(&KeyGenerator::new(bit_length), source)
    }

    pub fn generate_with(generator: &KeyGenerator, source: &mut Source) -> Result<Self> {
        let (_, sk) = generator.generate(source)?;
        Ok(Self::from_private_key(sk))
    }

    pub fn from_private_key(sk: PrivateKey) -> Self {
        Self {
            public: sk.public.clone(),
            private: Some(sk),
        }
    }

    pub fn from_public_key(pk: PublicKey) -> Self {
        Self {
            public: pk,
            private: None,
        }
    }

    /// Returns an instance holding only the public key, e.g. for a remote scorer.
    pub fn to_public(&self) -> Self {
        Self::from_public_key(self.public.clone())
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private.as_ref()
    }

    pub fn can_decrypt(&self) -> bool {
        self.private.is_some()
    }

    /// Samples a fresh [Blinding] r^n mod n^2, e.g. to precompute it ahead of encryption.
    pub fn blinding(&self, source: &mut Source) -> Result<Blinding> {
        Blinding::sample(&self.public, source)
    }

    /// Encrypts `m` with fresh randomness drawn from `source`.
    ///
    /// `m` may be negative; |m| must have at most bitlength(n) - 1 bits.
    pub fn encrypt(&self, m: &Integer, source: &mut Source) -> Result<Ciphertext> {
        self.public.check_plaintext(m)?;
        let blinding: Blinding = self.blinding(source)?;
        self.encrypt_with_blinding(m, blinding)
    }

    /// Encrypts `m` with caller-provided randomness `r`, a unit of Z/nZ.
    pub fn encrypt_with_randomness(&self, m: &Integer, r: &Integer) -> Result<Ciphertext> {
        self.public.check_plaintext(m)?;
        self.encrypt_with_blinding(m, Blinding::from_randomness(&self.public, r)?)
    }

    /// Encrypts `m` as (m * n + 1) * r^n mod n^2, with r^n given by `blinding`.
    ///
    /// With g = n + 1, g^m = 1 + m * n mod n^2, so the only exponentiation
    /// is the one that produced `blinding`.
    pub fn encrypt_with_blinding(&self, m: &Integer, blinding: Blinding) -> Result<Ciphertext> {
        let pk: &PublicKey = &self.public;
        pk.check_plaintext(m)?;
        let mut c: Integer = pk.reduce(m);
        c *= &pk.n;
        c += 1u32;
        c *= &blinding.0;
        c %= &pk.n_squared;
        Ok(Ciphertext(c))
    }

    /// Decrypts `c` with the CRT path, re-centered into (-n/2, n/2].
    pub fn decrypt(&self, c: &Ciphertext) -> Result<Integer> {
        self.decrypt_with(c, DecryptionMode::Crt)
    }

    /// Decrypts `c` with the selected [DecryptionMode], re-centered into (-n/2, n/2].
    pub fn decrypt_with(&self, c: &Ciphertext, mode: DecryptionMode) -> Result<Integer> {
        Ok(center(self.decrypt_raw(c, mode)?, &self.public.n))
    }

    /// Decrypts `c` to its residue in \[0, n), without re-centering.
    pub fn decrypt_raw(&self, c: &Ciphertext, mode: DecryptionMode) -> Result<Integer> {
        let sk: &PrivateKey = self.private.as_ref().ok_or(Error::MissingPrivateKey)?;
        self.public.check_ciphertext(c)?;

        let u: Integer = match mode {
            DecryptionMode::Standard => secure_pow_mod(&c.0, &sk.lambda, &self.public.n_squared),
            DecryptionMode::Crt => crt_pow_lambda(&c.0, sk),
        };

        let mut m: Integer = l_function(&u, &self.public.n);
        m *= &sk.mu;
        m %= &self.public.n;
        Ok(m)
    }

    /// Homomorphic addition: Dec(add(A, B)) = a + b.
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.public.check_ciphertext(a)?;
        self.public.check_ciphertext(b)?;
        let mut c: Integer = Integer::from(&a.0 * &b.0);
        c %= &self.public.n_squared;
        Ok(Ciphertext(c))
    }

    /// Homomorphic sum of any number of ciphertexts. The empty sum is
    /// [Self::trivial_zero].
    pub fn sum<'a, I>(&self, cts: I) -> Result<Ciphertext>
    where
        I: IntoIterator<Item = &'a Ciphertext>,
    {
        let mut acc: Integer = Integer::from(1);
        for c in cts {
            self.public.check_ciphertext(c)?;
            acc *= &c.0;
            acc %= &self.public.n_squared;
        }
        Ok(Ciphertext(acc))
    }

    /// Homomorphic scalar multiplication: Dec(scalar_multiply(A, s)) = a * s.
    ///
    /// `s` may be negative and is reduced mod n.
    pub fn scalar_multiply(&self, a: &Ciphertext, s: &Integer) -> Result<Ciphertext> {
        self.public.check_ciphertext(a)?;
        let s: Integer = self.public.reduce(s);
        Ok(Ciphertext(pow_mod(&a.0, &s, &self.public.n_squared)))
    }

    /// Homomorphic negation: Dec(negate(A)) = -a.
    pub fn negate(&self, a: &Ciphertext) -> Result<Ciphertext> {
        self.scalar_multiply(a, &Integer::from(-1))
    }

    /// Adds the cleartext `b` to A: add(A, encrypt(b)).
    pub fn add_scalar(&self, a: &Ciphertext, b: &Integer, source: &mut Source) -> Result<Ciphertext> {
        let enc_b: Ciphertext = self.encrypt(b, source)?;
        self.add(a, &enc_b)
    }

    /// XOR of an encrypted bit with the cleartext bit `b`:
    /// add_scalar(scalar_multiply(A, 1 - 2b), b).
    ///
    /// Only meaningful if A encrypts 0 or 1.
    pub fn xor_with_bit(&self, a: &Ciphertext, b: bool, source: &mut Source) -> Result<Ciphertext> {
        let (s, b): (Integer, Integer) = if b {
            (Integer::from(-1), Integer::from(1))
        } else {
            (Integer::from(1), Integer::from(0))
        };
        let flipped: Ciphertext = self.scalar_multiply(a, &s)?;
        self.add_scalar(&flipped, &b, source)
    }

    /// Refreshes the randomness of A by adding a fresh encryption of zero.
    pub fn rerandomize(&self, a: &Ciphertext, source: &mut Source) -> Result<Ciphertext> {
        self.add_scalar(a, &Integer::new(), source)
    }

    /// The neutral element 1, a (non-blinded) encryption of zero.
    pub fn trivial_zero(&self) -> Ciphertext {
        Ciphertext(Integer::from(1))
    }
}

/// c^lambda mod n^2 through two exponentiations mod p^2 and q^2 with
/// exponents reduced mod phi(p^2) and phi(q^2), recombined as
/// m2 + q^2 * ((q^2)^-1 * (m1 - m2) mod p^2).
fn crt_pow_lambda(c: &Integer, sk: &PrivateKey) -> Integer {
    let c_p: Integer = Integer::from(c % &sk.p_squared);
    let c_q: Integer = Integer::from(c % &sk.q_squared);
    let m1: Integer = secure_pow_mod(&c_p, &sk.lambda_mod_phi_p_squared, &sk.p_squared);
    let m2: Integer = secure_pow_mod(&c_q, &sk.lambda_mod_phi_q_squared, &sk.q_squared);
    let mut h: Integer = Integer::from(&m1 - &m2);
    h *= &sk.q_squared_inv;
    h = h.rem_euc(&sk.p_squared);
    h *= &sk.q_squared;
    h += m2;
    h
}
