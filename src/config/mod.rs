//! Configuration for simulation runs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration for a cohort simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Survey year the simulated cohort starts from
    pub start_year: i32,
    /// Last year projected, inclusive
    pub end_year: i32,
    /// Last birth decade with direct observations; later decades are
    /// covered by extrapolated tables
    pub cutoff_decade: i32,
    /// Whether to stratify the environment and transition tables by
    /// birth decade
    pub per_decade: bool,
    /// Seed for reproducible runs; `None` seeds from the OS
    pub random_seed: Option<u64>,
    /// Number of bootstrap trials
    pub trials: usize,
    /// Optional cap on the trial count
    pub trial_budget: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_year: 2010,
            end_year: 2050,
            cutoff_decade: 2010,
            per_decade: true,
            random_seed: None,
            trials: 20,
            trial_budget: None,
        }
    }
}

impl fmt::Display for SimulationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Configuration:")?;
        writeln!(f, "  Start Year: {}", self.start_year)?;
        writeln!(f, "  End Year: {}", self.end_year)?;
        writeln!(f, "  Cutoff Decade: {}", self.cutoff_decade)?;
        writeln!(f, "  Per-Decade Tables: {}", self.per_decade)?;
        if let Some(seed) = self.random_seed {
            writeln!(f, "  Random Seed: {seed}")?;
        }
        writeln!(f, "  Trials: {}", self.trials)?;
        if let Some(budget) = self.trial_budget {
            writeln!(f, "  Trial Budget: {budget}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_a_forty_year_horizon() {
        let config = SimulationConfig::default();
        assert_eq!(config.end_year - config.start_year, 40);
        assert!(config.per_decade);
    }

    #[test]
    fn display_includes_optional_fields_when_set() {
        let config = SimulationConfig {
            random_seed: Some(17),
            trial_budget: Some(100),
            ..SimulationConfig::default()
        };
        let rendered = config.to_string();
        assert!(rendered.contains("Random Seed: 17"));
        assert!(rendered.contains("Trial Budget: 100"));
    }
}
