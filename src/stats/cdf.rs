//! Cumulative distributions for inverse-transform sampling

use rand::Rng;
use rand::rngs::StdRng;

use crate::error::{Result, SimulationError};

/// A cumulative distribution over values of type `V`, supporting O(log n)
/// weighted draws.
///
/// Values are sorted by their natural order and zero-weight entries are
/// dropped at construction, so the running sums are strictly increasing.
#[derive(Debug, Clone)]
pub struct Cdf<V> {
    /// Distinct values in ascending order
    values: Vec<V>,
    /// Running sum of weights, aligned with `values`
    running: Vec<f64>,
    /// Total weight
    total: f64,
}

impl<V: Clone + Ord> Cdf<V> {
    /// Build a cumulative distribution from (value, weight) items.
    ///
    /// Entries with non-positive weight are skipped. Returns
    /// `DegenerateDistribution` when no positive weight remains.
    pub fn from_items<I: IntoIterator<Item = (V, f64)>>(items: I) -> Result<Self> {
        let mut pairs: Vec<(V, f64)> = items.into_iter().filter(|(_, w)| *w > 0.0).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut values = Vec::with_capacity(pairs.len());
        let mut running = Vec::with_capacity(pairs.len());
        let mut total = 0.0;
        for (value, weight) in pairs {
            total += weight;
            values.push(value);
            running.push(total);
        }

        if total <= 0.0 {
            return Err(SimulationError::DegenerateDistribution);
        }

        Ok(Self {
            values,
            running,
            total,
        })
    }

    /// Number of distinct values
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the distribution holds no values (never true after a
    /// successful construction)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total weight at construction
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Draw one value in proportion to its weight
    pub fn sample(&self, rng: &mut StdRng) -> V {
        let u = rng.random_range(0.0..self.total);
        // First position whose running sum reaches u
        let i = self.running.partition_point(|&c| c < u);
        self.values[i.min(self.values.len() - 1)].clone()
    }

    /// Draw `n` values with replacement
    pub fn sample_many(&self, n: usize, rng: &mut StdRng) -> Vec<V> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}
