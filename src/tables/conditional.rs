//! Generic key-conditioned outcome distributions

use std::fmt::Debug;
use std::hash::Hash;

use rand::rngs::StdRng;
use rustc_hash::FxHashMap;

use crate::error::{Result, SimulationError};
use crate::models::population::Population;
use crate::models::record::PersonRecord;
use crate::stats::{Hist, Pmf};

/// A conditional distribution P(value | key) estimated from survey
/// records.
///
/// Each cell is a normalized weighted distribution; an unweighted
/// frequency histogram over keys is kept alongside for diagnostics.
#[derive(Debug, Clone)]
pub struct ConditionalTable<K, V> {
    cells: FxHashMap<K, Pmf<V>>,
    freq: Hist<K>,
}

impl<K, V> ConditionalTable<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone + Eq + Hash + Ord,
{
    /// Estimate a table from a population.
    ///
    /// Records where either selector returns `None` are skipped. Every
    /// populated cell is normalized.
    pub fn from_population<FK, FV>(population: &Population, key_of: FK, value_of: FV) -> Self
    where
        FK: Fn(&PersonRecord) -> Option<K>,
        FV: Fn(&PersonRecord) -> Option<V>,
    {
        let mut cells: FxHashMap<K, Pmf<V>> = FxHashMap::default();
        let mut freq = Hist::new();

        for record in population.records() {
            let (Some(key), Some(value)) = (key_of(record), value_of(record)) else {
                continue;
            };
            freq.incr(key.clone());
            cells.entry(key).or_default().incr(value, record.weight);
        }

        for pmf in cells.values_mut() {
            if pmf.total() > 0.0 {
                // Non-empty with positive total, normalization cannot fail
                let _ = pmf.normalize();
            }
        }

        Self { cells, freq }
    }

    /// The cell distribution for `key`, if any observations landed there
    #[must_use]
    pub fn pmf(&self, key: &K) -> Option<&Pmf<V>> {
        self.cells.get(key)
    }

    /// P(value | key), or 0.0 when the cell is absent
    #[must_use]
    pub fn prob(&self, key: &K, value: &V) -> f64 {
        self.cells.get(key).map_or(0.0, |pmf| pmf.prob(value))
    }

    /// Unweighted number of observations that landed in `key`'s cell
    #[must_use]
    pub fn frequency(&self, key: &K) -> u64 {
        self.freq.count(key)
    }

    /// Number of populated cells
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Draw an outcome from the cell for `key`.
    ///
    /// Fails with `EmptyDistribution` when the cell is absent or holds no
    /// positive mass.
    pub fn choose(&self, key: &K, rng: &mut StdRng) -> Result<V> {
        let pmf = self.cells.get(key).ok_or_else(|| SimulationError::EmptyDistribution {
            key: format!("{key:?}"),
        })?;
        pmf.sample(rng)
            .map_err(|_| SimulationError::EmptyDistribution {
                key: format!("{key:?}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::models::types::{Affiliation, Sex};

    fn record(id: u64, upbringing: Affiliation, affiliation: Affiliation) -> PersonRecord {
        PersonRecord {
            id,
            weight: 1.0,
            survey_year: 2010,
            birth_year: Some(1960),
            sex: Sex::Female,
            affiliation,
            upbringing,
            mother_affiliation: Affiliation::Unknown,
            father_affiliation: Affiliation::Unknown,
            spouse_affiliation: Affiliation::Unknown,
            parent_affiliation: Affiliation::Unknown,
            child_birth_years: None,
        }
    }

    fn table_from(records: Vec<PersonRecord>) -> ConditionalTable<Affiliation, Affiliation> {
        let population = Population::from_records(records);
        ConditionalTable::from_population(
            &population,
            |r| r.upbringing.known(),
            |r| r.affiliation.known(),
        )
    }

    #[test]
    fn deterministic_cell_always_returns_its_value() {
        let table = table_from(vec![
            record(1, Affiliation::Catholic, Affiliation::Catholic),
            record(2, Affiliation::Catholic, Affiliation::Catholic),
        ]);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(
                table.choose(&Affiliation::Catholic, &mut rng).unwrap(),
                Affiliation::Catholic
            );
        }
        assert_eq!(table.frequency(&Affiliation::Catholic), 2);
    }

    #[test]
    fn cells_are_normalized() {
        let table = table_from(vec![
            record(1, Affiliation::Protestant, Affiliation::Protestant),
            record(2, Affiliation::Protestant, Affiliation::Protestant),
            record(3, Affiliation::Protestant, Affiliation::None),
        ]);

        let pmf = table.pmf(&Affiliation::Protestant).unwrap();
        assert!((pmf.total() - 1.0).abs() < 1e-9);
        assert!((table.prob(&Affiliation::Protestant, &Affiliation::None) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn missing_cell_is_an_error() {
        let table = table_from(vec![record(
            1,
            Affiliation::Protestant,
            Affiliation::Protestant,
        )]);

        let mut rng = StdRng::seed_from_u64(2);
        let err = table.choose(&Affiliation::Jewish, &mut rng).unwrap_err();
        assert!(matches!(err, SimulationError::EmptyDistribution { .. }));
    }

    #[test]
    fn rebuilding_from_the_same_snapshot_gives_identical_tables() {
        // Varied weights and several cells, so any ordering sensitivity
        // in accumulation would show up as drifting probabilities.
        let records: Vec<PersonRecord> = (0..60)
            .map(|i| {
                let upbringing = Affiliation::KNOWN[i as usize % 5];
                let affiliation = Affiliation::KNOWN[(i as usize * 3 + 1) % 5];
                let mut r = record(i, upbringing, affiliation);
                r.weight = 0.25 + (i as f64) * 0.37;
                r
            })
            .collect();
        let population = Population::from_records(records);

        let build = || {
            ConditionalTable::from_population(
                &population,
                |r: &PersonRecord| r.upbringing.known(),
                |r: &PersonRecord| r.affiliation.known(),
            )
        };
        let first = build();
        let second = build();

        assert_eq!(first.cell_count(), second.cell_count());
        for key in Affiliation::KNOWN {
            assert_eq!(first.frequency(&key), second.frequency(&key));
            for value in Affiliation::KNOWN {
                assert_eq!(first.prob(&key, &value), second.prob(&key, &value));
            }
        }
    }

    #[test]
    fn nonresponse_records_are_skipped() {
        let table = table_from(vec![
            record(1, Affiliation::Unknown, Affiliation::Protestant),
            record(2, Affiliation::Protestant, Affiliation::Unknown),
        ]);
        assert_eq!(table.cell_count(), 0);
    }
}
