//! Weighted probability mass functions and unweighted histograms

use std::hash::Hash;

use rand::rngs::StdRng;
use rustc_hash::FxHashMap;

use crate::error::{Result, SimulationError};
use crate::stats::cdf::Cdf;

/// A discrete distribution over values of type `V`, accumulated as
/// non-negative weights.
///
/// Values keep their insertion order, so iteration and reporting are
/// deterministic regardless of hashing. Masses are raw weights until
/// [`Pmf::normalize`] is called; after normalization, `prob` returns a
/// probability.
#[derive(Debug, Clone)]
pub struct Pmf<V> {
    /// (value, mass) pairs in first-insertion order
    entries: Vec<(V, f64)>,
    /// Value index into `entries`
    index: FxHashMap<V, usize>,
}

impl<V> Default for Pmf<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<V: Clone + Eq + Hash> Pmf<V> {
    /// Create an empty distribution
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a distribution from (value, weight) items
    pub fn from_items<I: IntoIterator<Item = (V, f64)>>(items: I) -> Self {
        let mut pmf = Self::new();
        for (value, weight) in items {
            pmf.incr(value, weight);
        }
        pmf
    }

    /// Add `weight` to the mass of `value`, inserting it if absent
    pub fn incr(&mut self, value: V, weight: f64) {
        if let Some(&i) = self.index.get(&value) {
            self.entries[i].1 += weight;
        } else {
            self.index.insert(value.clone(), self.entries.len());
            self.entries.push((value, weight));
        }
    }

    /// Set the mass of `value`, inserting it if absent
    pub fn set(&mut self, value: V, weight: f64) {
        if let Some(&i) = self.index.get(&value) {
            self.entries[i].1 = weight;
        } else {
            self.index.insert(value.clone(), self.entries.len());
            self.entries.push((value, weight));
        }
    }

    /// The mass currently stored for `value` (0.0 if absent).
    ///
    /// This is a probability only after [`Pmf::normalize`].
    #[must_use]
    pub fn prob(&self, value: &V) -> f64 {
        self.index.get(value).map_or(0.0, |&i| self.entries[i].1)
    }

    /// Sum of all stored masses
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Number of distinct values
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the distribution holds no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scale all masses so they sum to 1.0
    pub fn normalize(&mut self) -> Result<()> {
        self.normalize_to(1.0)
    }

    /// Scale all masses so they sum to `target`
    pub fn normalize_to(&mut self, target: f64) -> Result<()> {
        let total = self.total();
        if total == 0.0 {
            if target == 0.0 {
                return Ok(());
            }
            return Err(SimulationError::DegenerateDistribution);
        }
        let factor = target / total;
        for (_, w) in &mut self.entries {
            *w *= factor;
        }
        Ok(())
    }

    /// Iterate over (value, mass) pairs in insertion order
    pub fn items(&self) -> impl Iterator<Item = (&V, f64)> {
        self.entries.iter().map(|(v, w)| (v, *w))
    }
}

impl<V: Clone + Eq + Hash + Ord> Pmf<V> {
    /// Draw a single value, weighted by mass.
    ///
    /// Builds a one-shot cumulative distribution; prefer [`Cdf`] directly
    /// when drawing many values from the same distribution.
    pub fn sample(&self, rng: &mut StdRng) -> Result<V> {
        let cdf = Cdf::from_items(self.items().map(|(v, w)| (v.clone(), w)))?;
        Ok(cdf.sample(rng))
    }
}

/// An unweighted frequency count over values of type `V`
#[derive(Debug, Clone)]
pub struct Hist<V> {
    counts: FxHashMap<V, u64>,
    total: u64,
}

impl<V> Default for Hist<V> {
    fn default() -> Self {
        Self {
            counts: FxHashMap::default(),
            total: 0,
        }
    }
}

impl<V: Eq + Hash> Hist<V> {
    /// Create an empty histogram
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `value`
    pub fn incr(&mut self, value: V) {
        *self.counts.entry(value).or_insert(0) += 1;
        self.total += 1;
    }

    /// Occurrences of `value`
    #[must_use]
    pub fn count(&self, value: &V) -> u64 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Total number of recorded occurrences
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether no occurrences have been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Fraction of `true` outcomes in a boolean histogram, or `None` when the
/// histogram has no observations at all.
#[must_use]
pub fn fraction_true(hist: &Hist<bool>) -> Option<f64> {
    if hist.is_empty() {
        return None;
    }
    Some(hist.count(&true) as f64 / hist.total() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incr_accumulates_and_normalize_sums_to_one() {
        let mut pmf = Pmf::new();
        pmf.incr("a", 2.0);
        pmf.incr("b", 1.0);
        pmf.incr("a", 1.0);

        assert!((pmf.prob(&"a") - 3.0).abs() < 1e-12);
        pmf.normalize().unwrap();

        assert!((pmf.total() - 1.0).abs() < 1e-9);
        assert!((pmf.prob(&"a") - 0.75).abs() < 1e-9);
        assert!((pmf.prob(&"b") - 0.25).abs() < 1e-9);
    }

    #[test]
    fn normalize_zero_mass_is_degenerate() {
        let mut pmf: Pmf<u32> = Pmf::new();
        pmf.set(1, 0.0);
        assert_eq!(
            pmf.normalize(),
            Err(crate::error::SimulationError::DegenerateDistribution)
        );
    }

    #[test]
    fn items_preserve_insertion_order() {
        let pmf = Pmf::from_items([(30, 1.0), (10, 1.0), (20, 1.0)]);
        let values: Vec<i32> = pmf.items().map(|(v, _)| *v).collect();
        assert_eq!(values, vec![30, 10, 20]);
    }

    #[test]
    fn fraction_true_handles_empty_and_mixed() {
        let mut hist = Hist::new();
        assert_eq!(fraction_true(&hist), None);

        hist.incr(true);
        hist.incr(true);
        hist.incr(false);
        assert!((fraction_true(&hist).unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }
}
