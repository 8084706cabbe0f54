//! Logging utilities
//!
//! This module provides standardized logging setup and functions for
//! operations.

use env_logger::Builder;
use env_logger::Env;

/// Initialize env_logger with a default filter of `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = Builder::from_env(Env::default().default_filter_or("info")).try_init();
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `items` - Number of items processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, items: usize, elapsed: Option<std::time::Duration>) {
    if let Some(duration) = elapsed {
        log::info!("Successfully {operation} {items} items in {duration:?}");
    } else {
        log::info!("Successfully {operation} {items} items");
    }
}
