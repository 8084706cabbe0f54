//! Cohort projection engine

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use crate::algorithm::birth::BirthHazardModel;
use crate::algorithm::generation::GenerationalTransitionModel;
use crate::error::Result;
use crate::models::population::Population;
use crate::models::record::RecordIdAllocator;
use crate::stats::Pmf;

/// Supplies the age distribution each projected year should be matched
/// to.
///
/// Demographic age structure is an external input to the simulation;
/// implementors must cover every year they are asked about.
pub trait AgeTargets {
    /// Target age distribution (normalized) for `year`
    fn target_for(&self, year: i32) -> Pmf<i32>;
}

/// The same age distribution for every year, e.g. the start survey's own
/// structure under a no-demographic-change assumption
#[derive(Debug, Clone)]
pub struct StationaryAgeTargets(pub Pmf<i32>);

impl AgeTargets for StationaryAgeTargets {
    fn target_for(&self, _year: i32) -> Pmf<i32> {
        self.0.clone()
    }
}

/// A simulated next generation merged with its surviving parents.
///
/// `sample_size` pins every later projection to the parent generation's
/// size, so yearly snapshots stay comparable.
#[derive(Debug, Clone)]
pub struct Generation {
    population: Population,
    sample_size: usize,
}

impl Generation {
    /// The merged parent-plus-children working population
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Size the projections are drawn at
    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Project the working population onto `year` by age-matched
    /// resampling against `target`
    pub fn project(&self, year: i32, target: &Pmf<i32>, rng: &mut StdRng) -> Result<Population> {
        self.population
            .resample_by_age(self.sample_size, year, target, rng)
    }
}

/// Drives one simulated cohort: generate children once, then project the
/// merged population onto each requested year.
#[derive(Debug, Clone)]
pub struct Cohort {
    population: Population,
    model: GenerationalTransitionModel,
    birth_model: BirthHazardModel,
}

impl Cohort {
    /// Assemble a cohort from its source population and fitted models
    #[must_use]
    pub fn new(
        population: Population,
        model: GenerationalTransitionModel,
        birth_model: BirthHazardModel,
    ) -> Self {
        Self {
            population,
            model,
            birth_model,
        }
    }

    /// The source population
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// The transition model, mutably (for decade extension)
    pub fn model_mut(&mut self) -> &mut GenerationalTransitionModel {
        &mut self.model
    }

    /// Simulate children for `start` and merge them with the survivors
    pub fn make_next_generation(
        &self,
        start: &Population,
        ids: &mut RecordIdAllocator,
        rng: &mut StdRng,
    ) -> Result<Generation> {
        let children = self
            .model
            .simulate_generation(start, &self.birth_model, ids, rng)?;
        log::info!(
            "Simulated {} children from {} parents",
            children.len(),
            start.len()
        );

        let mut merged = start.clone();
        merged.merge(children);
        Ok(Generation {
            population: merged,
            sample_size: start.len(),
        })
    }

    /// Run one simulation pass from `start_year` through `end_year`
    /// inclusive, returning a population snapshot per year.
    ///
    /// The next generation is simulated once; each year is then an
    /// independent age-matched resample of the same merged population.
    /// Years deliberately do not chain, so per-year sampling noise stays
    /// uncorrelated across the series.
    pub fn run_simulation<T: AgeTargets>(
        &self,
        start_year: i32,
        end_year: i32,
        targets: &T,
        ids: &mut RecordIdAllocator,
        rng: &mut StdRng,
    ) -> Result<BTreeMap<i32, Population>> {
        let start = self
            .population
            .subsample(|record| record.survey_year == start_year);
        log::info!(
            "Starting simulation with {} respondents interviewed in {start_year}",
            start.len()
        );

        let generation = self.make_next_generation(&start, ids, rng)?;

        let mut snapshots = BTreeMap::new();
        for year in start_year..=end_year {
            let target = targets.target_for(year);
            let snapshot = generation.project(year, &target, rng)?;
            snapshots.insert(year, snapshot);
        }
        Ok(snapshots)
    }
}
