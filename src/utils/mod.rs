//! Shared utilities
//!
//! Logging setup and progress reporting used across the simulation.

pub mod logging;
pub mod progress;

pub use logging::{init_logging, log_operation_complete};
pub use progress::{create_main_progress_bar, finish_progress_bar};
