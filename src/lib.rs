//! A Rust library for forecasting categorical population traits across
//! generations, using weighted survey data, conditional transmission
//! tables, and bootstrap-resampled stochastic simulation.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod stats;
pub mod tables;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::SimulationConfig;
pub use error::{Result, SimulationError};
pub use models::{Affiliation, PersonRecord, Population, RecordIdAllocator, Sex};

// Distribution primitives
pub use stats::{Cdf, Hist, Pmf};

// Transmission tables
pub use tables::{ConditionalTable, EnvironmentTable, SpouseTable, TransitionTable};

// Simulation engine
pub use algorithm::{
    AgeTargets, BirthHazardModel, Cohort, Generation, GenerationalTransitionModel, Prediction,
    StationaryAgeTargets,
};
pub use algorithm::{
    affiliation_share_stage, aggregate, forecast_affiliation_shares, run_trials,
    run_trials_with_budget,
};

// Regression consumption helpers
pub use algorithm::{CoefficientEstimate, LogisticFit, LogitFit, project_share_series};

// Utility functions
pub use utils::init_logging;
