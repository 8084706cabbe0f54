//! Simulation algorithms
//!
//! Birth hazards, the generational transition model, cohort projection,
//! the bootstrap driver, and regression-based consumption helpers.

pub mod birth;
pub mod bootstrap;
pub mod cohort;
pub mod generation;
pub mod regression;

pub use birth::BirthHazardModel;
pub use bootstrap::{
    Prediction, affiliation_share_stage, aggregate, forecast_affiliation_shares, run_trials,
    run_trials_with_budget,
};
pub use cohort::{AgeTargets, Cohort, Generation, StationaryAgeTargets};
pub use generation::{DecadeComponent, GenerationalTransitionModel};
pub use regression::{CoefficientEstimate, LogisticFit, LogitFit, project_share_series};
