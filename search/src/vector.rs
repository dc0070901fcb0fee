use serde::{Deserialize, Serialize};
use utils::popcount;

/// Fixed-length vector of bits. Immutable once built, the magnitude
/// (number of set bits) is computed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<bool>", into = "Vec<bool>")]
pub struct BinaryVector {
    bits: Vec<bool>,
    magnitude: usize,
}

impl BinaryVector {
    pub fn zeros(len: usize) -> Self {
        Self::from_bits(vec![false; len])
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        let magnitude: usize = popcount(&bits);
        Self { bits, magnitude }
    }

    /// Builds a vector of length `len` with the given positions set.
    ///
    /// # Panics
    /// If a position is not smaller than `len`.
    pub fn from_indices<I: IntoIterator<Item = usize>>(len: usize, indices: I) -> Self {
        let mut bits: Vec<bool> = vec![false; len];
        indices.into_iter().for_each(|i| {
            assert!(i < len, "index {} out of range for length {}", i, len);
            bits[i] = true;
        });
        Self::from_bits(bits)
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn magnitude(&self) -> usize {
        self.magnitude
    }

    pub fn get(&self, i: usize) -> bool {
        self.bits[i]
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Positions of the set bits, in increasing order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().enumerate().filter_map(|(i, b)| b.then_some(i))
    }

    /// Number of positions set in both vectors. Lengths must match.
    pub fn intersection(&self, other: &BinaryVector) -> usize {
        debug_assert_eq!(self.len(), other.len());
        self.bits.iter().zip(other.bits.iter()).filter(|(a, b)| **a && **b).count()
    }
}

impl From<Vec<bool>> for BinaryVector {
    fn from(bits: Vec<bool>) -> Self {
        Self::from_bits(bits)
    }
}

impl From<BinaryVector> for Vec<bool> {
    fn from(v: BinaryVector) -> Self {
        v.bits
    }
}

impl FromIterator<bool> for BinaryVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::from_bits(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_and_ones() {
        let v: BinaryVector = [true, false, true, true].into_iter().collect();
        assert_eq!(v.len(), 4);
        assert_eq!(v.magnitude(), 3);
        assert_eq!(v.ones().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(BinaryVector::zeros(7).magnitude(), 0);
    }

    #[test]
    fn intersection_counts_shared_bits() {
        let a: BinaryVector = BinaryVector::from_indices(6, [0, 2, 3]);
        let b: BinaryVector = BinaryVector::from_indices(6, [0, 1, 2, 5]);
        assert_eq!(a.intersection(&b), 2);
        assert_eq!(a.intersection(&BinaryVector::zeros(6)), 0);
    }

    #[test]
    fn deserialized_vector_recomputes_magnitude() {
        let v: BinaryVector = serde_json::from_str("[true,false,true]").unwrap();
        assert_eq!(v.magnitude(), 2);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[true,false,true]");
    }
}
