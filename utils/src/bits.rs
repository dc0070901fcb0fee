use rug::Integer;

/// Number of bits of |x|, 0 for x = 0.
#[inline(always)]
pub fn bit_length(x: &Integer) -> u32 {
    x.significant_bits()
}

/// Number of bits needed to write `x` in binary, 0 for x = 0.
#[inline(always)]
pub fn bit_length_u64(x: u64) -> u32 {
    u64::BITS - x.leading_zeros()
}

/// Number of set entries of a bit slice.
#[inline(always)]
pub fn popcount(bits: &[bool]) -> usize {
    bits.iter().filter(|b| **b).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        assert_eq!(bit_length(&Integer::from(0)), 0);
        assert_eq!(bit_length(&Integer::from(1)), 1);
        assert_eq!(bit_length(&Integer::from(255)), 8);
        assert_eq!(bit_length(&Integer::from(-256)), 9);
        assert_eq!(bit_length_u64(0), 0);
        assert_eq!(bit_length_u64(4), 3);
        assert_eq!(bit_length_u64(u64::MAX), 64);
    }

    #[test]
    fn count() {
        assert_eq!(popcount(&[]), 0);
        assert_eq!(popcount(&[true, false, true, true]), 3);
    }
}
