//! Generational transition model
//!
//! Chains the spouse, environment, and transition tables into a child
//! generator, optionally stratified by the child's birth decade.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::rngs::StdRng;

use crate::algorithm::birth::BirthHazardModel;
use crate::error::{Result, SimulationError};
use crate::models::population::Population;
use crate::models::record::{PersonRecord, RecordIdAllocator};
use crate::models::types::{Affiliation, Sex};
use crate::tables::{EnvironmentTable, SpouseTable, TransitionTable};

/// Which per-decade component an extension applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecadeComponent {
    /// The upbringing environment tables
    Environment,
    /// The upbringing-to-adult transition tables
    Transition,
}

/// The full parent-to-child trait model.
///
/// Pooled tables are always built; when stratified, environment and
/// transition tables are additionally estimated per birth decade.
/// Decades past the observed range are covered by [`Self::extend`],
/// which shares the source decade's table by handle rather than copying
/// it, so later refinements of the source reach every alias.
///
/// Fallback policy is deliberately asymmetric: a missing decade or cell
/// for the upbringing environment falls back (decade to pooled, pooled
/// to a uniformly chosen parent), while missing spouse or transition
/// data propagates as an error.
#[derive(Debug, Clone)]
pub struct GenerationalTransitionModel {
    spouse: SpouseTable,
    environment: EnvironmentTable,
    transition: TransitionTable,
    environment_by_decade: BTreeMap<i32, Arc<EnvironmentTable>>,
    transition_by_decade: BTreeMap<i32, Arc<TransitionTable>>,
    stratified: bool,
}

impl GenerationalTransitionModel {
    /// Estimate all component tables from `population`.
    ///
    /// With `by_decade` set, per-decade environment and transition tables
    /// are estimated from the decade partitions as well.
    #[must_use]
    pub fn from_population(population: &Population, by_decade: bool) -> Self {
        let spouse = SpouseTable::from_population(population);
        let environment = EnvironmentTable::from_population(population);
        let transition = TransitionTable::from_population(population);

        let mut environment_by_decade = BTreeMap::new();
        let mut transition_by_decade = BTreeMap::new();
        if by_decade {
            for (decade, partition) in population.partition_by_decade() {
                environment_by_decade
                    .insert(decade, Arc::new(EnvironmentTable::from_population(&partition)));
                transition_by_decade
                    .insert(decade, Arc::new(TransitionTable::from_population(&partition)));
            }
            log::info!(
                "Estimated decade tables for {} decades",
                environment_by_decade.len()
            );
        }

        Self {
            spouse,
            environment,
            transition,
            environment_by_decade,
            transition_by_decade,
            stratified: by_decade,
        }
    }

    /// Estimate the model from a bootstrap replicate of `population`
    pub fn resampled_from(
        population: &Population,
        by_decade: bool,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let replicate = population.resample(None, rng)?;
        Ok(Self::from_population(&replicate, by_decade))
    }

    /// Whether per-decade tables are in use
    #[must_use]
    pub fn is_stratified(&self) -> bool {
        self.stratified
    }

    /// The spouse table
    #[must_use]
    pub fn spouse_table(&self) -> &SpouseTable {
        &self.spouse
    }

    /// The per-decade environment table, if one covers `decade`
    #[must_use]
    pub fn decade_environment(&self, decade: i32) -> Option<Arc<EnvironmentTable>> {
        self.environment_by_decade.get(&decade).cloned()
    }

    /// The per-decade transition table, if one covers `decade`
    #[must_use]
    pub fn decade_transition(&self, decade: i32) -> Option<Arc<TransitionTable>> {
        self.transition_by_decade.get(&decade).cloned()
    }

    /// Cover `targets` with the table already held for `source_decade`.
    ///
    /// The table is shared by handle, not copied.
    pub fn extend(
        &mut self,
        component: DecadeComponent,
        source_decade: i32,
        targets: &[i32],
    ) -> Result<()> {
        match component {
            DecadeComponent::Environment => {
                let source = self
                    .environment_by_decade
                    .get(&source_decade)
                    .cloned()
                    .ok_or(SimulationError::MissingDecade {
                        component: "environment",
                        decade: source_decade,
                    })?;
                for &target in targets {
                    self.environment_by_decade.insert(target, Arc::clone(&source));
                }
            }
            DecadeComponent::Transition => {
                let source = self
                    .transition_by_decade
                    .get(&source_decade)
                    .cloned()
                    .ok_or(SimulationError::MissingDecade {
                        component: "transition",
                        decade: source_decade,
                    })?;
                for &target in targets {
                    self.transition_by_decade.insert(target, Arc::clone(&source));
                }
            }
        }
        Ok(())
    }

    /// Extend both components from `source_decade` through
    /// `through_decade` inclusive, in steps of ten years
    pub fn extrapolate(&mut self, source_decade: i32, through_decade: i32) -> Result<()> {
        let targets: Vec<i32> = (source_decade + 10..=through_decade)
            .step_by(10)
            .collect();
        self.extend(DecadeComponent::Environment, source_decade, &targets)?;
        self.extend(DecadeComponent::Transition, source_decade, &targets)?;
        log::info!(
            "Extended decade tables from {source_decade} through {through_decade}"
        );
        Ok(())
    }

    /// Draw the affiliation a child of this parent pair is raised in.
    ///
    /// Never fails. In stratified mode an uncovered decade, or a covered
    /// decade with no usable cell, deliberately uses the pooled table
    /// instead of reporting the missing decade; upbringing always
    /// resolves, and decade strictness is enforced by
    /// [`Self::choose_outcome`] alone. The pooled table in turn falls
    /// back to a uniformly chosen parent.
    pub fn choose_upbringing(
        &self,
        decade: i32,
        mother: Affiliation,
        father: Affiliation,
        rng: &mut StdRng,
    ) -> Affiliation {
        if self.stratified {
            if let Some(table) = self.environment_by_decade.get(&decade) {
                if let Ok(raised) = table.choose(mother, father, rng) {
                    return raised;
                }
            }
        }
        self.environment.generate_raised(mother, father, rng)
    }

    /// Draw the adult affiliation of someone raised in `raised`, born in
    /// `decade`.
    ///
    /// When stratified, an uncovered decade fails with `MissingDecade`
    /// and an empty cell propagates `EmptyDistribution`.
    pub fn choose_outcome(
        &self,
        decade: i32,
        raised: Affiliation,
        rng: &mut StdRng,
    ) -> Result<Affiliation> {
        if self.stratified {
            let table =
                self.transition_by_decade
                    .get(&decade)
                    .ok_or(SimulationError::MissingDecade {
                        component: "transition",
                        decade,
                    })?;
            return table.generate_outcome(raised, rng);
        }
        self.transition.generate_outcome(raised, rng)
    }

    /// Simulate one child per eligible parent in `parents`.
    ///
    /// Parents with an unknown affiliation or birth year are skipped and
    /// counted, so the synthetic generation can shrink relative to its
    /// parents. For each remaining parent: draw a spouse, assign the
    /// mother/father roles by the parent's sex, draw the child's birth
    /// year from the hazard model, then its upbringing and adult outcome.
    pub fn simulate_generation(
        &self,
        parents: &Population,
        birth_model: &BirthHazardModel,
        ids: &mut RecordIdAllocator,
        rng: &mut StdRng,
    ) -> Result<Population> {
        let mut children = Population::new();
        let mut skipped = 0usize;

        for parent in parents.records() {
            let (Some(affiliation), Some(birth_year)) =
                (parent.affiliation.known(), parent.birth_year)
            else {
                skipped += 1;
                continue;
            };

            let spouse = self.spouse.generate_spouse(parent.sex, affiliation, rng)?;
            let (mother, father) = match parent.sex {
                Sex::Female => (affiliation, spouse),
                Sex::Male => (spouse, affiliation),
            };

            let child_birth_year = birth_year + birth_model.random_age(rng) as i32;
            let decade = child_birth_year.div_euclid(10) * 10;

            let raised = self.choose_upbringing(decade, mother, father, rng);
            let outcome = self.choose_outcome(decade, raised, rng)?;

            children.insert(PersonRecord {
                id: ids.next_id(),
                weight: parent.weight,
                survey_year: parent.survey_year,
                birth_year: Some(child_birth_year),
                sex: parent.sex,
                affiliation: outcome,
                upbringing: raised,
                mother_affiliation: mother,
                father_affiliation: father,
                spouse_affiliation: Affiliation::Unknown,
                parent_affiliation: affiliation,
                child_birth_years: None,
            });
        }

        if skipped > 0 {
            let share = skipped as f64 / parents.len() as f64;
            if share > 0.1 {
                log::warn!(
                    "Skipped {skipped} of {} parents ({:.1}%) with missing affiliation or birth year",
                    parents.len(),
                    share * 100.0
                );
            } else {
                log::info!("Skipped {skipped} of {} parents", parents.len());
            }
        }

        Ok(children)
    }
}
