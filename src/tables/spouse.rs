//! Spouse affiliation tables

use rand::rngs::StdRng;

use crate::error::Result;
use crate::models::population::Population;
use crate::models::types::{Affiliation, Sex};
use crate::stats::{Hist, fraction_true};
use crate::tables::conditional::ConditionalTable;

/// Conditional spouse-affiliation distributions, one per role
/// orientation.
///
/// Both orientations are estimated from reported mother/father pairs in
/// a single scan, which keeps the two tables consistent with each other.
/// A per-sex histogram of same-affiliation marriages is kept for
/// homogamy diagnostics.
#[derive(Debug, Clone)]
pub struct SpouseTable {
    /// P(wife's affiliation | husband's affiliation), keyed by father
    wife_given_husband: ConditionalTable<Affiliation, Affiliation>,
    /// P(husband's affiliation | wife's affiliation), keyed by mother
    husband_given_wife: ConditionalTable<Affiliation, Affiliation>,
    /// Same-affiliation indicator per respondent sex (female, male)
    same_by_sex: [Hist<bool>; 2],
}

impl SpouseTable {
    /// Estimate spouse tables from the parent pairs reported in
    /// `population`. Pairs with nonresponse on either side are skipped.
    #[must_use]
    pub fn from_population(population: &Population) -> Self {
        let wife_given_husband = ConditionalTable::from_population(
            population,
            |r| r.father_affiliation.known(),
            |r| r.mother_affiliation.known(),
        );
        let husband_given_wife = ConditionalTable::from_population(
            population,
            |r| r.mother_affiliation.known(),
            |r| r.father_affiliation.known(),
        );

        let mut same_by_sex = [Hist::new(), Hist::new()];
        for record in population.records() {
            let (Some(ma), Some(pa)) = (
                record.mother_affiliation.known(),
                record.father_affiliation.known(),
            ) else {
                continue;
            };
            same_by_sex[record.sex.index()].incr(ma == pa);
        }

        Self {
            wife_given_husband,
            husband_given_wife,
            same_by_sex,
        }
    }

    /// Draw a spouse affiliation for a person of the given sex and
    /// affiliation.
    ///
    /// Propagates `EmptyDistribution` when the person's affiliation was
    /// never observed in the relevant role; spouse generation has no
    /// sensible neutral fallback.
    pub fn generate_spouse(
        &self,
        sex: Sex,
        affiliation: Affiliation,
        rng: &mut StdRng,
    ) -> Result<Affiliation> {
        match sex {
            Sex::Male => self.wife_given_husband.choose(&affiliation, rng),
            Sex::Female => self.husband_given_wife.choose(&affiliation, rng),
        }
    }

    /// Observed probability that a marriage is same-affiliation, per
    /// respondent sex (female, male). `None` where no pairs were observed.
    #[must_use]
    pub fn prob_same(&self) -> [Option<f64>; 2] {
        [
            fraction_true(&self.same_by_sex[0]),
            fraction_true(&self.same_by_sex[1]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::models::record::PersonRecord;

    fn record(id: u64, sex: Sex, ma: Affiliation, pa: Affiliation) -> PersonRecord {
        PersonRecord {
            id,
            weight: 1.0,
            survey_year: 2010,
            birth_year: Some(1960),
            sex,
            affiliation: Affiliation::Protestant,
            upbringing: Affiliation::Protestant,
            mother_affiliation: ma,
            father_affiliation: pa,
            spouse_affiliation: Affiliation::Unknown,
            parent_affiliation: Affiliation::Unknown,
            child_birth_years: None,
        }
    }

    #[test]
    fn orientations_are_keyed_by_opposite_role() {
        let population = Population::from_records(vec![
            record(1, Sex::Female, Affiliation::Catholic, Affiliation::Protestant),
            record(2, Sex::Male, Affiliation::Catholic, Affiliation::Protestant),
        ]);
        let table = SpouseTable::from_population(&population);

        let mut rng = StdRng::seed_from_u64(9);
        // A Protestant husband was only ever paired with a Catholic wife.
        assert_eq!(
            table
                .generate_spouse(Sex::Male, Affiliation::Protestant, &mut rng)
                .unwrap(),
            Affiliation::Catholic
        );
        // A Catholic wife was only ever paired with a Protestant husband.
        assert_eq!(
            table
                .generate_spouse(Sex::Female, Affiliation::Catholic, &mut rng)
                .unwrap(),
            Affiliation::Protestant
        );
    }

    #[test]
    fn unobserved_affiliation_propagates_error() {
        let population = Population::from_records(vec![record(
            1,
            Sex::Female,
            Affiliation::Catholic,
            Affiliation::Protestant,
        )]);
        let table = SpouseTable::from_population(&population);

        let mut rng = StdRng::seed_from_u64(4);
        assert!(
            table
                .generate_spouse(Sex::Male, Affiliation::Jewish, &mut rng)
                .is_err()
        );
    }

    #[test]
    fn prob_same_splits_by_respondent_sex() {
        let population = Population::from_records(vec![
            record(1, Sex::Female, Affiliation::Catholic, Affiliation::Catholic),
            record(2, Sex::Female, Affiliation::Catholic, Affiliation::Protestant),
            record(3, Sex::Male, Affiliation::None, Affiliation::None),
        ]);
        let table = SpouseTable::from_population(&population);

        let [female, male] = table.prob_same();
        assert!((female.unwrap() - 0.5).abs() < 1e-12);
        assert!((male.unwrap() - 1.0).abs() < 1e-12);
    }
}
