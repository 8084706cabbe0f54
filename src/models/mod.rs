//! Domain model types
//!
//! Survey records, the categorical trait domain, and the keyed population
//! container the simulation operates on.

pub mod population;
pub mod record;
pub mod types;

pub use population::Population;
pub use record::{PersonRecord, RecordIdAllocator, SYNTHETIC_ID_BASE};
pub use types::{Affiliation, Sex};
