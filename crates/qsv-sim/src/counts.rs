//! Outcome histogram accumulated over shots.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use qsv_ir::ClbitId;

/// Measurement counts: bit string → number of shots that produced it.
///
/// Bit strings are fixed width, one character per classical bit, highest
/// classical index first. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring` (0 if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no shot has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Outcomes by descending count, ties broken by bit string.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut sorted: Vec<_> = self.counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.sorted().into_iter().next()
    }

    /// Relative frequency of each outcome.
    pub fn probabilities(&self) -> FxHashMap<String, f64> {
        let total = self.total_shots() as f64;
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }

    /// Fold `other` into `self` by key-wise summation.
    pub fn merge(&mut self, other: Counts) {
        if self.counts.is_empty() {
            self.counts = other.counts;
            return;
        }
        for (bitstring, count) in other.counts {
            self.insert(bitstring, count);
        }
    }

    /// Counts for a single classical bit, keyed `"0"` / `"1"`.
    ///
    /// Outcomes too short to contain `clbit` are ignored.
    pub fn marginal(&self, clbit: ClbitId) -> Counts {
        let mut marginal = Counts::new();
        for (bitstring, &count) in &self.counts {
            let bit = bitstring
                .len()
                .checked_sub(clbit.index() + 1)
                .and_then(|pos| bitstring.as_bytes().get(pos));
            match bit {
                Some(b'0') => marginal.insert("0", count),
                Some(b'1') => marginal.insert("1", count),
                _ => {}
            }
        }
        marginal
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bitstring, count) in iter {
            counts.insert(bitstring, count);
        }
        counts
    }
}

impl<'a> IntoIterator for &'a Counts {
    type Item = (&'a String, &'a u64);
    type IntoIter = std::collections::hash_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}
