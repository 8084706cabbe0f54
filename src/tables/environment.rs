//! Upbringing environment table

use rand::Rng;
use rand::rngs::StdRng;

use crate::error::Result;
use crate::models::population::Population;
use crate::models::types::Affiliation;
use crate::tables::conditional::ConditionalTable;

/// P(upbringing | mother's and father's affiliation).
///
/// Unlike the spouse and transition tables, an unobserved parent pair has
/// a natural fallback: raise the child in one parent's affiliation,
/// chosen uniformly.
#[derive(Debug, Clone)]
pub struct EnvironmentTable {
    table: ConditionalTable<(Affiliation, Affiliation), Affiliation>,
}

impl EnvironmentTable {
    /// Estimate the table from reported parent pairs and upbringings
    #[must_use]
    pub fn from_population(population: &Population) -> Self {
        let table = ConditionalTable::from_population(
            population,
            |r| {
                match (
                    r.mother_affiliation.known(),
                    r.father_affiliation.known(),
                ) {
                    (Some(ma), Some(pa)) => Some((ma, pa)),
                    _ => None,
                }
            },
            |r| r.upbringing.known(),
        );
        Self { table }
    }

    /// Number of observed parent-pair cells
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.table.cell_count()
    }

    /// Draw an upbringing from the observed cell for this parent pair.
    ///
    /// Fails with `EmptyDistribution` for an unobserved pair; callers that
    /// want the uniform-parent fallback use [`Self::generate_raised`].
    pub fn choose(
        &self,
        mother: Affiliation,
        father: Affiliation,
        rng: &mut StdRng,
    ) -> Result<Affiliation> {
        self.table.choose(&(mother, father), rng)
    }

    /// Draw an upbringing for a child of this parent pair, falling back to
    /// one parent's affiliation (uniformly chosen) when the pair was never
    /// observed.
    pub fn generate_raised(
        &self,
        mother: Affiliation,
        father: Affiliation,
        rng: &mut StdRng,
    ) -> Affiliation {
        match self.choose(mother, father, rng) {
            Ok(raised) => raised,
            Err(_) => {
                if rng.random_range(0..2) == 0 {
                    mother
                } else {
                    father
                }
            }
        }
    }
}
