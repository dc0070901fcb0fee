use std::cmp::Ordering;

use paillier::Ciphertext;
use serde::{Deserialize, Serialize};

/// Scorer response for one corpus entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreRecord<P> {
    pub id: u64,
    pub encrypted_intersection: Ciphertext,
    pub candidate_magnitude: u64,
    pub payload: P,
}

/// Clear part of a record whose intersection travels inside a packet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackedEntry<P> {
    pub id: u64,
    pub candidate_magnitude: u64,
    pub payload: P,
}

/// Scorer response with intersections packed `width` bits per slot.
/// `entries[i]` owns the i-th packed value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackedScores<P> {
    pub width: u32,
    pub packets: Vec<Ciphertext>,
    pub entries: Vec<PackedEntry<P>>,
}

/// Decrypted overlap between the query and one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub intersection: u64,
    pub query_magnitude: u64,
    pub candidate_magnitude: u64,
}

impl Score {
    pub fn new(intersection: u64, query_magnitude: u64, candidate_magnitude: u64) -> Self {
        Self {
            intersection,
            query_magnitude,
            candidate_magnitude,
        }
    }

    pub fn union(&self) -> u64 {
        (self.query_magnitude + self.candidate_magnitude).saturating_sub(self.intersection)
    }

    /// Intersection over union, 0 when both vectors are empty.
    pub fn iou(&self) -> f64 {
        ratio(self.intersection, self.union())
    }

    /// Share of the query covered by the entry.
    pub fn query_containment(&self) -> f64 {
        ratio(self.intersection, self.query_magnitude)
    }

    /// Share of the entry covered by the query.
    pub fn candidate_containment(&self) -> f64 {
        ratio(self.intersection, self.candidate_magnitude)
    }

    /// Exact comparison of IOUs as rationals, so that equal ratios with
    /// different magnitudes compare equal.
    pub fn cmp_iou(&self, other: &Score) -> Ordering {
        let (a_num, a_den) = self.iou_fraction();
        let (b_num, b_den) = other.iou_fraction();
        (a_num * b_den).cmp(&(b_num * a_den))
    }

    fn iou_fraction(&self) -> (u128, u128) {
        match self.union() {
            0 => (0, 1),
            u => (self.intersection as u128, u as u128),
        }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// A scored corpus entry, as seen by the querier after decryption.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry<P> {
    pub id: u64,
    pub score: Score,
    pub payload: P,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios() {
        let s: Score = Score::new(2, 3, 3);
        assert_eq!(s.union(), 4);
        assert_eq!(s.iou(), 0.5);
        assert!((s.query_containment() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(Score::new(4, 4, 4).iou(), 1.0);
        assert_eq!(Score::new(0, 3, 5).iou(), 0.0);
    }

    #[test]
    fn empty_vectors_score_zero() {
        let s: Score = Score::new(0, 0, 0);
        assert_eq!(s.iou(), 0.0);
        assert_eq!(s.query_containment(), 0.0);
        assert_eq!(s.candidate_containment(), 0.0);
        assert_eq!(s.cmp_iou(&Score::new(0, 3, 3)), Ordering::Equal);
    }

    #[test]
    fn exact_comparison() {
        // 1/3 == 2/6
        assert_eq!(Score::new(1, 2, 2).cmp_iou(&Score::new(2, 4, 4)), Ordering::Equal);
        assert_eq!(Score::new(2, 3, 3).cmp_iou(&Score::new(1, 2, 2)), Ordering::Greater);
        assert_eq!(Score::new(0, 1, 1).cmp_iou(&Score::new(1, 9, 9)), Ordering::Less);
    }
}
