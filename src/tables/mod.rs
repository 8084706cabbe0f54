//! Conditional transmission tables
//!
//! The tables that relate a person's trait to their spouse, their
//! upbringing, and their parents, all built from weighted survey records.

pub mod conditional;
pub mod environment;
pub mod spouse;
pub mod transition;

pub use conditional::ConditionalTable;
pub use environment::EnvironmentTable;
pub use spouse::SpouseTable;
pub use transition::TransitionTable;
