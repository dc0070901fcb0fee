use rug::Integer;

/// base^exp mod modulus for a public, non-negative exponent.
#[inline]
pub fn pow_mod(base: &Integer, exp: &Integer, modulus: &Integer) -> Integer {
    debug_assert!(*exp >= 0, "invalid exponent: {} < 0", exp);
    match base.pow_mod_ref(exp, modulus) {
        Some(res) => Integer::from(res),
        // only negative exponents of non-invertible bases have no result
        None => Integer::new(),
    }
}

/// base^exp mod modulus for a secret exponent, using GMP's side-channel
/// resistant exponentiation. `modulus` must be odd.
#[inline]
pub fn secure_pow_mod(base: &Integer, exp: &Integer, modulus: &Integer) -> Integer {
    debug_assert!(modulus.is_odd(), "invalid modulus: {} is even", modulus);
    if *exp == 0 {
        return Integer::from(1);
    }
    Integer::from(base.secure_pow_mod_ref(exp, modulus))
}

/// L(u) = (u - 1) / n.
///
/// Exact for u = 1 mod n, which holds for c^lambda mod n^2 when c is a
/// valid ciphertext under the key.
#[inline]
pub fn l_function(u: &Integer, n: &Integer) -> Integer {
    let mut t: Integer = Integer::from(u - 1u32);
    debug_assert!(t.is_divisible(n), "L(u) called on u != 1 mod n");
    t /= n;
    t
}

/// Maps a residue of \[0, n) onto (-n/2, n/2].
#[inline]
pub fn center(mut m: Integer, n: &Integer) -> Integer {
    let half: Integer = Integer::from(n >> 1u32);
    if m > half {
        m -= n;
    }
    m
}
