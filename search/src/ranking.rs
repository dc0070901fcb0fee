use serde::{Deserialize, Serialize};

use crate::ScoredEntry;

/// Order among entries of exactly equal IOU, by position in the corpus
/// scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    #[default]
    FirstSeen,
    LastSeen,
}

/// Scored entries by decreasing IOU.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranking<P> {
    matches: Vec<ScoredEntry<P>>,
}

impl<P> Ranking<P> {
    /// Best match, `None` only for an empty corpus.
    pub fn best(&self) -> Option<&ScoredEntry<P>> {
        self.matches.first()
    }

    pub fn matches(&self) -> &[ScoredEntry<P>] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<ScoredEntry<P>> {
        self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Ranks `scored`, given in corpus order, and keeps the `top_k` best.
///
/// IOUs are compared exactly, so entries only tie when their ratios are
/// equal as rationals; ties are then ordered by `tie_break`. An entry of
/// IOU 0 still ranks, so a non-empty corpus always has a best match.
pub fn rank<P>(scored: Vec<ScoredEntry<P>>, top_k: usize, tie_break: TieBreak) -> Ranking<P> {
    let mut indexed: Vec<(usize, ScoredEntry<P>)> = scored.into_iter().enumerate().collect();
    indexed.sort_by(|(i, a), (j, b)| {
        b.score.cmp_iou(&a.score).then_with(|| match tie_break {
            TieBreak::FirstSeen => i.cmp(j),
            TieBreak::LastSeen => j.cmp(i),
        })
    });
    indexed.truncate(top_k);
    Ranking {
        matches: indexed.into_iter().map(|(_, e)| e).collect(),
    }
}
