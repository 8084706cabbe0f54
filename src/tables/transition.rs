//! Upbringing-to-adult transition table

use rand::rngs::StdRng;

use crate::error::Result;
use crate::models::population::Population;
use crate::models::record::PersonRecord;
use crate::models::types::Affiliation;
use crate::tables::conditional::ConditionalTable;

/// P(adult affiliation | affiliation raised in).
///
/// Also constructible over other parent/child attribute pairs via
/// [`Self::with_selectors`], e.g. the post-hoc parent-to-child table used
/// to compare simulated generations against observed ones.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    table: ConditionalTable<Affiliation, Affiliation>,
}

impl TransitionTable {
    /// Estimate the upbringing-to-adult table from `population`
    #[must_use]
    pub fn from_population(population: &Population) -> Self {
        Self::with_selectors(
            population,
            |r| r.upbringing.known(),
            |r| r.affiliation.known(),
        )
    }

    /// Estimate a transition table over custom selectors
    pub fn with_selectors<FK, FV>(population: &Population, key_of: FK, value_of: FV) -> Self
    where
        FK: Fn(&PersonRecord) -> Option<Affiliation>,
        FV: Fn(&PersonRecord) -> Option<Affiliation>,
    {
        Self {
            table: ConditionalTable::from_population(population, key_of, value_of),
        }
    }

    /// Transition table keyed by the simulated parent's affiliation, for
    /// diffing a synthetic generation against its parents
    #[must_use]
    pub fn generation_table(population: &Population) -> Self {
        Self::with_selectors(
            population,
            |r| r.parent_affiliation.known(),
            |r| r.affiliation.known(),
        )
    }

    /// P(outcome | raised)
    #[must_use]
    pub fn prob(&self, raised: Affiliation, outcome: Affiliation) -> f64 {
        self.table.prob(&raised, &outcome)
    }

    /// Unweighted observation count for an upbringing cell
    #[must_use]
    pub fn frequency(&self, raised: Affiliation) -> u64 {
        self.table.frequency(&raised)
    }

    /// Number of populated upbringing cells
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.table.cell_count()
    }

    /// Draw an adult affiliation for someone raised in `raised`.
    ///
    /// Propagates `EmptyDistribution` when the upbringing was never
    /// observed; there is no neutral substitute for a missing transition.
    pub fn generate_outcome(&self, raised: Affiliation, rng: &mut StdRng) -> Result<Affiliation> {
        self.table.choose(&raised, rng)
    }
}
