//! Categorical trait and sex domains

use std::fmt;

use serde::{Deserialize, Serialize};

/// Religious affiliation categories, plus an `Unknown` sentinel for
/// nonresponse.
///
/// The variant order here is the fixed reporting order used by share
/// vectors and prediction columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Affiliation {
    /// Protestant denominations
    Protestant,
    /// Catholic
    Catholic,
    /// Jewish
    Jewish,
    /// Other religions
    Other,
    /// No religious affiliation
    None,
    /// Missing or refused response
    Unknown,
}

impl Affiliation {
    /// The five substantive categories, in reporting order
    pub const KNOWN: [Self; 5] = [
        Self::Protestant,
        Self::Catholic,
        Self::Jewish,
        Self::Other,
        Self::None,
    ];

    /// Whether this is a substantive category rather than nonresponse
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// This category if substantive, otherwise `None`
    #[must_use]
    pub const fn known(self) -> Option<Self> {
        if self.is_known() { Some(self) } else { None }
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Protestant => "Protestant",
            Self::Catholic => "Catholic",
            Self::Jewish => "Jewish",
            Self::Other => "Other",
            Self::None => "None",
            Self::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// Respondent sex as recorded in the survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Female respondent
    Female,
    /// Male respondent
    Male,
}

impl Sex {
    /// Index into per-sex arrays (female first)
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Female => write!(f, "Female"),
            Self::Male => write!(f, "Male"),
        }
    }
}
