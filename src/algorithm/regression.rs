//! Consumption-side regression types
//!
//! Fitting happens outside this crate; these types carry externally
//! estimated coefficients and apply them to records and cohorts.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::models::population::Population;

/// The coefficient name conventionally used for the intercept term
pub const INTERCEPT_NAME: &str = "(Intercept)";

/// One estimated regression coefficient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEstimate {
    /// Covariate name, or [`INTERCEPT_NAME`]
    pub name: String,
    /// Point estimate on the log-odds scale
    pub estimate: f64,
    /// Standard error of the estimate
    pub std_error: f64,
    /// Estimate divided by standard error
    pub z_score: f64,
}

/// A logistic fit of a binary trait against birth year.
///
/// Birth years are centered on 1900 before the linear predictor is
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogitFit {
    /// Log-odds at birth year 1900
    pub intercept: f64,
    /// Log-odds change per birth year
    pub slope: f64,
}

impl LogitFit {
    /// Fitted probability of the trait for someone born in `birth_year`
    #[must_use]
    pub fn fit_probability(&self, birth_year: i32) -> f64 {
        sigmoid(self.intercept + self.slope * f64::from(birth_year - 1900))
    }
}

/// A multi-covariate logistic fit applied through a covariate lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticFit {
    /// Estimated coefficients, intercept included
    pub coefficients: Vec<CoefficientEstimate>,
}

impl LogisticFit {
    /// Fitted probability given a covariate lookup.
    ///
    /// Returns `None` as soon as any non-intercept covariate is missing;
    /// a partial linear predictor is not a prediction.
    #[must_use]
    pub fn fit_probability<F: Fn(&str) -> Option<f64>>(&self, covariate: F) -> Option<f64> {
        let mut log_odds = 0.0;
        for coefficient in &self.coefficients {
            if coefficient.name == INTERCEPT_NAME {
                log_odds += coefficient.estimate;
            } else {
                log_odds += coefficient.estimate * covariate(&coefficient.name)?;
            }
        }
        Some(sigmoid(log_odds))
    }
}

fn sigmoid(log_odds: f64) -> f64 {
    let odds = log_odds.exp();
    odds / (1.0 + odds)
}

/// Age a cohort year by year against a fitted probability curve.
///
/// For each offset in `start_delta..=end_delta`, every record's birth
/// year is shifted by the offset and a Bernoulli draw against the fitted
/// probability decides whether the record carries the trait that year.
/// Returns (year, fraction) pairs anchored at `base_year`. Records with
/// an unknown birth year are skipped.
pub fn project_share_series(
    population: &Population,
    fit: &LogitFit,
    base_year: i32,
    start_delta: i32,
    end_delta: i32,
    rng: &mut StdRng,
) -> Vec<(i32, f64)> {
    let mut series = Vec::new();
    for delta in start_delta..=end_delta {
        let mut total = 0u64;
        let mut count = 0u64;
        for record in population.records() {
            let Some(birth_year) = record.birth_year else {
                continue;
            };
            let p = fit.fit_probability(birth_year + delta);
            total += 1;
            if rng.random::<f64>() <= p {
                count += 1;
            }
        }
        if total > 0 {
            series.push((base_year + delta, count as f64 / total as f64));
        }
    }
    series
}
