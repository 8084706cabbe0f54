//! Discrete distribution primitives
//!
//! This module provides the weighted and cumulative distribution types
//! that the resampling and table-construction code is built on.

pub mod cdf;
pub mod pmf;

pub use cdf::Cdf;
pub use pmf::{Hist, Pmf, fraction_true};
