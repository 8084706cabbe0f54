//! Integration tests for the cohort projection engine

use rand::SeedableRng;
use rand::rngs::StdRng;
use smallvec::smallvec;

use cohort_forecast::algorithm::{
    BirthHazardModel, Cohort, GenerationalTransitionModel, StationaryAgeTargets,
};
use cohort_forecast::models::{Affiliation, PersonRecord, Population, RecordIdAllocator, Sex};

fn respondent(id: u64, affiliation: Affiliation, birth_year: i32) -> PersonRecord {
    PersonRecord {
        id,
        weight: 1.0,
        survey_year: 2010,
        birth_year: Some(birth_year),
        sex: if id % 2 == 0 { Sex::Female } else { Sex::Male },
        affiliation,
        upbringing: affiliation,
        mother_affiliation: affiliation,
        father_affiliation: affiliation,
        spouse_affiliation: affiliation,
        parent_affiliation: Affiliation::Unknown,
        child_birth_years: Some(smallvec![birth_year + 25, birth_year + 30]),
    }
}

fn homogeneous_cohort(n: u64) -> Cohort {
    let population =
        Population::from_records((0..n).map(|i| respondent(i, Affiliation::Protestant, 1950 + (i as i32 % 30))));
    let model = GenerationalTransitionModel::from_population(&population, false);
    let birth_model = BirthHazardModel::from_population(&population).unwrap();
    Cohort::new(population, model, birth_model)
}

#[test]
fn homogeneous_cohort_stays_homogeneous() {
    let cohort = homogeneous_cohort(200);
    let mut ids = RecordIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(17);

    let generation = cohort
        .make_next_generation(cohort.population(), &mut ids, &mut rng)
        .unwrap();

    // All parents were eligible, so the merged population doubled.
    assert_eq!(generation.population().len(), 400);
    assert_eq!(generation.population().synthetic_count(), 200);
    assert_eq!(generation.sample_size(), 200);

    let shares = generation.population().affiliation_shares().unwrap();
    assert!((shares[0] - 1.0).abs() < 1e-12);
}

#[test]
fn generation_shrinks_by_the_ineligible_parent_count() {
    let mut records: Vec<PersonRecord> = (0..50)
        .map(|i| respondent(i, Affiliation::Protestant, 1950 + (i as i32 % 30)))
        .collect();
    for i in 0..5 {
        let mut r = respondent(100 + i, Affiliation::Unknown, 1960);
        r.upbringing = Affiliation::Protestant;
        r.mother_affiliation = Affiliation::Protestant;
        r.father_affiliation = Affiliation::Protestant;
        records.push(r);
    }
    let population = Population::from_records(records);
    let model = GenerationalTransitionModel::from_population(&population, false);
    let birth_model = BirthHazardModel::from_population(&population).unwrap();
    let cohort = Cohort::new(population, model, birth_model);

    let mut ids = RecordIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(29);
    let generation = cohort
        .make_next_generation(cohort.population(), &mut ids, &mut rng)
        .unwrap();

    // 55 parents, 5 ineligible: 50 children merged onto 55 survivors.
    assert_eq!(generation.population().len(), 105);
    assert_eq!(generation.population().synthetic_count(), 50);
}

#[test]
fn zero_year_horizon_yields_one_snapshot_of_start_size() {
    let cohort = homogeneous_cohort(150);
    let target = cohort.population().make_age_pmf(2010).unwrap();
    let targets = StationaryAgeTargets(target);

    let mut ids = RecordIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(41);
    let snapshots = cohort
        .run_simulation(2010, 2010, &targets, &mut ids, &mut rng)
        .unwrap();

    assert_eq!(snapshots.len(), 1);
    let snapshot = &snapshots[&2010];
    assert_eq!(snapshot.len(), 150);
}

#[test]
fn multi_year_snapshots_cover_every_year_at_start_size() {
    let cohort = homogeneous_cohort(100);
    let target = cohort.population().make_age_pmf(2010).unwrap();
    let targets = StationaryAgeTargets(target);

    let mut ids = RecordIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(53);
    let snapshots = cohort
        .run_simulation(2010, 2020, &targets, &mut ids, &mut rng)
        .unwrap();

    assert_eq!(snapshots.len(), 11);
    for year in 2010..=2020 {
        let snapshot = &snapshots[&year];
        assert_eq!(snapshot.len(), 100, "wrong size for {year}");
        let shares = snapshot.affiliation_shares().unwrap();
        assert!((shares[0] - 1.0).abs() < 1e-12, "defections appeared in {year}");
    }
}

#[test]
fn stratified_cohort_needs_extrapolated_decades() {
    let population = Population::from_records(
        (0..100).map(|i| respondent(i, Affiliation::Protestant, 1950 + (i as i32 % 30))),
    );
    let model = GenerationalTransitionModel::from_population(&population, true);
    let birth_model = BirthHazardModel::from_population(&population).unwrap();
    let mut cohort = Cohort::new(population, model, birth_model);

    let mut ids = RecordIdAllocator::new();
    let mut rng = StdRng::seed_from_u64(61);

    // Children are born decades after 1970, where no table was observed.
    let bare = cohort.make_next_generation(cohort.population(), &mut ids, &mut rng);
    assert!(bare.is_err());

    cohort.model_mut().extrapolate(1970, 2070).unwrap();
    let generation = cohort
        .make_next_generation(cohort.population(), &mut ids, &mut rng)
        .unwrap();
    assert_eq!(generation.population().synthetic_count(), 100);
}
