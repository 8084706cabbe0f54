//! Error handling for the simulation pipeline.

/// Specialized error type for distribution construction and simulation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// A distribution was built or normalized with zero total mass
    #[error("distribution has zero total mass and cannot be normalized or sampled")]
    DegenerateDistribution,

    /// A conditional table was queried at a key with no observations
    #[error("no observations recorded for key {key}")]
    EmptyDistribution {
        /// Rendered form of the missing key
        key: String,
    },

    /// A per-decade model component was queried for an uncovered decade
    #[error("{component} table has no entry for decade {decade}")]
    MissingDecade {
        /// Which model component lacked the decade
        component: &'static str,
        /// Requested birth decade
        decade: i32,
    },

    /// A hazard lookup fell outside the observed age range
    #[error("no hazard estimate available for age {age}")]
    UndefinedAge {
        /// Requested age in whole years
        age: u32,
    },
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimulationError>;
