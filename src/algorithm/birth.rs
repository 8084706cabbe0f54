//! Age-specific birth hazards estimated from child rosters

use rand::rngs::StdRng;

use crate::error::{Result, SimulationError};
use crate::models::population::Population;
use crate::stats::{Cdf, Hist, fraction_true};

/// Youngest age at which a birth is tallied
pub const MIN_CHILDBEARING_AGE: u32 = 13;
/// Ages at or above this are never tallied
pub const MAX_CHILDBEARING_AGE: u32 = 90;
/// Respondents born before this decade are excluded from hazard
/// estimation; their rosters are too incomplete to trust.
pub const BIRTH_DECADE_CUTOFF: i32 = 1940;

/// Per-age hazard of having a child, with a weighted sampler over ages.
///
/// For each qualifying respondent, every age from
/// [`MIN_CHILDBEARING_AGE`] up to their age at interview (capped at
/// [`MAX_CHILDBEARING_AGE`]) contributes one yes/no observation: did a
/// child arrive at that age. The hazard at an age is the fraction of
/// yes observations; ages nobody was observed at have no hazard.
#[derive(Debug, Clone)]
pub struct BirthHazardModel {
    /// Hazard per age, `None` where the age was never observed
    hazards: Vec<Option<f64>>,
    /// Ages weighted by hazard, for drawing a parenting age
    age_cdf: Cdf<u32>,
}

impl BirthHazardModel {
    /// Estimate hazards from the child rosters in `population`.
    ///
    /// Fails with `DegenerateDistribution` when no positive hazard is
    /// observed at any age.
    pub fn from_population(population: &Population) -> Result<Self> {
        let mut tallies: Vec<Hist<bool>> = (0..MAX_CHILDBEARING_AGE).map(|_| Hist::new()).collect();

        for record in population.records() {
            let Some(decade) = record.decade() else {
                continue;
            };
            if decade < BIRTH_DECADE_CUTOFF {
                continue;
            }
            let Some(ages) = record.ages_when_children_born() else {
                continue;
            };
            let Some(age_at_survey) = record.age_at(record.survey_year) else {
                continue;
            };
            if age_at_survey <= MIN_CHILDBEARING_AGE as i32 {
                continue;
            }

            let upper = (age_at_survey as u32).min(MAX_CHILDBEARING_AGE);
            for age in MIN_CHILDBEARING_AGE..upper {
                tallies[age as usize].incr(ages.contains(&(age as i32)));
            }
        }

        let hazards: Vec<Option<f64>> = tallies.iter().map(fraction_true).collect();

        let age_cdf = Cdf::from_items(
            hazards
                .iter()
                .enumerate()
                .filter_map(|(age, hazard)| hazard.map(|h| (age as u32, h))),
        )?;

        Ok(Self { hazards, age_cdf })
    }

    /// Hazard of a birth at `age`.
    ///
    /// Fails with `UndefinedAge` outside the observed range.
    pub fn probability(&self, age: u32) -> Result<f64> {
        self.hazards
            .get(age as usize)
            .copied()
            .flatten()
            .ok_or(SimulationError::UndefinedAge { age })
    }

    /// Draw a parenting age in proportion to the hazards
    pub fn random_age(&self, rng: &mut StdRng) -> u32 {
        self.age_cdf.sample(rng)
    }

    /// Number of ages with an observed hazard
    #[must_use]
    pub fn observed_ages(&self) -> usize {
        self.hazards.iter().flatten().count()
    }
}
