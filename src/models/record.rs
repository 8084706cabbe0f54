//! Survey records and synthetic record identity

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::models::types::{Affiliation, Sex};

/// First identifier handed out for simulated records. Real survey case
/// ids stay well below this, so provenance is recoverable from the id.
pub const SYNTHETIC_ID_BASE: u64 = 90_000;

/// One survey respondent, observed or simulated.
///
/// Fields that the survey may leave unanswered are optional; categorical
/// nonresponse is carried as [`Affiliation::Unknown`] so the record stays
/// usable for the tables that do not need the missing field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Case id; ids at or above [`SYNTHETIC_ID_BASE`] are simulated
    pub id: u64,
    /// Sampling weight
    pub weight: f64,
    /// Year the interview took place
    pub survey_year: i32,
    /// Year of birth, if reported
    pub birth_year: Option<i32>,
    /// Respondent sex
    pub sex: Sex,
    /// Current affiliation
    pub affiliation: Affiliation,
    /// Affiliation the respondent was raised in
    pub upbringing: Affiliation,
    /// Mother's affiliation
    pub mother_affiliation: Affiliation,
    /// Father's affiliation
    pub father_affiliation: Affiliation,
    /// Spouse's affiliation
    pub spouse_affiliation: Affiliation,
    /// Affiliation of the simulated parent (set on synthetic records only)
    pub parent_affiliation: Affiliation,
    /// Birth years of the respondent's children, if the roster was reported
    pub child_birth_years: Option<SmallVec<[i32; 4]>>,
}

impl PersonRecord {
    /// Birth decade (floor to a multiple of 10), if the birth year is known
    #[must_use]
    pub fn decade(&self) -> Option<i32> {
        self.birth_year.map(|y| y.div_euclid(10) * 10)
    }

    /// Age in whole years at the start of `year`, if the birth year is known
    #[must_use]
    pub fn age_at(&self, year: i32) -> Option<i32> {
        self.birth_year.map(|b| year - b)
    }

    /// Respondent's age at each child's birth, in roster order.
    ///
    /// `None` when either the birth year or the child roster is missing.
    #[must_use]
    pub fn ages_when_children_born(&self) -> Option<SmallVec<[i32; 4]>> {
        let birth_year = self.birth_year?;
        let children = self.child_birth_years.as_ref()?;
        Some(children.iter().map(|&y| y - birth_year).collect())
    }
}

/// Hands out ids for simulated records.
///
/// Owned by the simulation run rather than shared globally, so parallel
/// bootstrap trials each carry their own counter.
#[derive(Debug, Clone)]
pub struct RecordIdAllocator {
    next: u64,
}

impl RecordIdAllocator {
    /// Create an allocator starting at [`SYNTHETIC_ID_BASE`]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: SYNTHETIC_ID_BASE,
        }
    }

    /// Take the next unused id
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Whether `id` was produced by an allocator rather than the survey
    #[must_use]
    pub const fn is_synthetic(id: u64) -> bool {
        id >= SYNTHETIC_ID_BASE
    }
}

impl Default for RecordIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    fn record(birth_year: Option<i32>) -> PersonRecord {
        PersonRecord {
            id: 1,
            weight: 1.0,
            survey_year: 2010,
            birth_year,
            sex: Sex::Female,
            affiliation: Affiliation::Protestant,
            upbringing: Affiliation::Protestant,
            mother_affiliation: Affiliation::Unknown,
            father_affiliation: Affiliation::Unknown,
            spouse_affiliation: Affiliation::Unknown,
            parent_affiliation: Affiliation::Unknown,
            child_birth_years: None,
        }
    }

    #[test]
    fn decade_floors_toward_negative_infinity() {
        let mut r = record(Some(1987));
        assert_eq!(r.decade(), Some(1980));
        r.birth_year = Some(-5);
        assert_eq!(r.decade(), Some(-10));
        r.birth_year = None;
        assert_eq!(r.decade(), None);
    }

    #[test]
    fn child_ages_need_both_fields() {
        let mut r = record(Some(1950));
        assert_eq!(r.ages_when_children_born(), None);

        r.child_birth_years = Some(smallvec![1975, 1980]);
        let ages = r.ages_when_children_born().unwrap();
        assert_eq!(ages.as_slice(), &[25, 30]);

        r.birth_year = None;
        assert_eq!(r.ages_when_children_born(), None);
    }

    #[test]
    fn allocator_ids_are_sequential_and_synthetic() {
        let mut ids = RecordIdAllocator::new();
        let first = ids.next_id();
        let second = ids.next_id();
        assert_eq!(first, SYNTHETIC_ID_BASE);
        assert_eq!(second, SYNTHETIC_ID_BASE + 1);
        assert!(RecordIdAllocator::is_synthetic(first));
        assert!(!RecordIdAllocator::is_synthetic(42));
    }
}
