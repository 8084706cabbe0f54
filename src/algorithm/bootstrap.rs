//! Bootstrap trial driver and prediction aggregation

use std::collections::BTreeMap;
use std::time::Instant;

use indicatif::ParallelProgressIterator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::birth::{BirthHazardModel, MAX_CHILDBEARING_AGE};
use crate::algorithm::cohort::{AgeTargets, Cohort};
use crate::algorithm::generation::GenerationalTransitionModel;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::models::population::Population;
use crate::models::record::{PersonRecord, RecordIdAllocator};
use crate::models::types::Affiliation;
use crate::utils::logging::log_operation_complete;
use crate::utils::progress::{create_main_progress_bar, finish_progress_bar};

/// One aggregated prediction column: the trial mean and an uncertainty
/// span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Mean across trials
    pub mean: f64,
    /// (low, high) span trimming one extreme trial on each side
    pub span: (f64, f64),
}

/// Run `trials` bootstrap trials of `stage` in parallel.
///
/// Each trial draws its own full-size weighted replicate of `source` and
/// runs `stage` on it with a trial-local RNG seeded from `seed` plus the
/// trial index, so results are reproducible regardless of scheduling.
/// Returns one row of stage outputs per trial; any failing trial fails
/// the run.
pub fn run_trials<F>(
    source: &Population,
    trials: usize,
    seed: u64,
    stage: F,
) -> Result<Vec<Vec<f64>>>
where
    F: Fn(&Population, &mut StdRng) -> Result<Vec<f64>> + Sync,
{
    log::info!("Running {trials} bootstrap trials over {} records", source.len());
    let started = Instant::now();
    let bar = create_main_progress_bar(trials as u64, Some("bootstrap trials"));

    let rows: Result<Vec<Vec<f64>>> = (0..trials as u64)
        .into_par_iter()
        .progress_with(bar.clone())
        .map(|trial| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial));
            let replicate = source.resample(None, &mut rng)?;
            stage(&replicate, &mut rng)
        })
        .collect();
    let rows = rows?;

    finish_progress_bar(&bar, Some("bootstrap trials done"));
    log_operation_complete("ran", trials, Some(started.elapsed()));
    Ok(rows)
}

/// [`run_trials`] with an optional cap on the trial count.
///
/// A requested count above the budget is clamped with a warning rather
/// than rejected.
pub fn run_trials_with_budget<F>(
    source: &Population,
    trials: usize,
    budget: Option<usize>,
    seed: u64,
    stage: F,
) -> Result<Vec<Vec<f64>>>
where
    F: Fn(&Population, &mut StdRng) -> Result<Vec<f64>> + Sync,
{
    let trials = match budget {
        Some(budget) if trials > budget => {
            log::warn!("Clamping {trials} requested trials to budget {budget}");
            budget
        }
        _ => trials,
    };
    run_trials(source, trials, seed, stage)
}

/// Collapse trial rows into one [`Prediction`] per column.
///
/// The span trims the single lowest and highest trial when three or more
/// trials ran; otherwise it is the plain min/max.
#[must_use]
pub fn aggregate(rows: &[Vec<f64>]) -> Vec<Prediction> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    (0..first.len())
        .map(|col| {
            let mut column: Vec<f64> = rows.iter().map(|row| row[col]).collect();
            let mean = column.iter().sum::<f64>() / column.len() as f64;
            column.sort_by(|a, b| a.total_cmp(b));

            let span = if column.len() >= 3 {
                (column[1], column[column.len() - 2])
            } else {
                (column[0], column[column.len() - 1])
            };
            Prediction { mean, span }
        })
        .collect()
}

/// A stage computing the substantive affiliation shares of the replicate
pub fn affiliation_share_stage(replicate: &Population, _rng: &mut StdRng) -> Result<Vec<f64>> {
    Ok(replicate.affiliation_shares()?.to_vec())
}

/// Run a full affiliation forecast under `config`.
///
/// Each trial refits the transition and birth models on its own
/// replicate, simulates a generation, and projects every year from
/// `start_year` through `end_year`. When stratified, per-decade tables
/// are extrapolated from `cutoff_decade` far enough to cover any
/// simulated birth year. Returns the aggregated predictions per year, in
/// [`Affiliation::KNOWN`] column order.
pub fn forecast_affiliation_shares<T: AgeTargets + Sync>(
    config: &SimulationConfig,
    source: &Population,
    targets: &T,
) -> Result<BTreeMap<i32, Vec<Prediction>>> {
    let seed = config.random_seed.unwrap_or_else(rand::random);
    let columns = Affiliation::KNOWN.len();

    let rows = run_trials_with_budget(
        source,
        config.trials,
        config.trial_budget,
        seed,
        |replicate, rng| {
            let mut model =
                GenerationalTransitionModel::from_population(replicate, config.per_decade);
            if config.per_decade {
                // Children can be born up to the oldest parenting age
                // past the last observed birth decade.
                let last_decade = replicate
                    .records()
                    .filter_map(PersonRecord::decade)
                    .max()
                    .unwrap_or(config.cutoff_decade);
                model.extrapolate(
                    config.cutoff_decade,
                    last_decade + MAX_CHILDBEARING_AGE as i32,
                )?;
            }
            let birth_model = BirthHazardModel::from_population(replicate)?;
            let cohort = Cohort::new(replicate.clone(), model, birth_model);

            let mut ids = RecordIdAllocator::new();
            let snapshots = cohort.run_simulation(
                config.start_year,
                config.end_year,
                targets,
                &mut ids,
                rng,
            )?;

            let mut row = Vec::with_capacity(snapshots.len() * columns);
            for snapshot in snapshots.values() {
                row.extend(snapshot.affiliation_shares()?);
            }
            Ok(row)
        },
    )?;

    let flat = aggregate(&rows);
    let mut by_year = BTreeMap::new();
    if flat.is_empty() {
        return Ok(by_year);
    }
    for (i, year) in (config.start_year..=config.end_year).enumerate() {
        let base = i * columns;
        by_year.insert(year, flat[base..base + columns].to_vec());
    }
    Ok(by_year)
}
