//! Keyed population container with weighted and age-matched resampling

use std::collections::BTreeMap;
use std::hash::Hash;
use std::sync::OnceLock;

use itertools::Itertools;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::models::record::{PersonRecord, RecordIdAllocator};
use crate::models::types::Affiliation;
use crate::stats::{Cdf, Pmf};

/// A collection of survey records keyed by an index id.
///
/// Keys and record ids are distinct on purpose: resampling with
/// replacement stores duplicate draws of the same record under fresh
/// keys while each clone keeps its original `id`, so case provenance
/// survives any number of resampling rounds.
#[derive(Debug, Default)]
pub struct Population {
    records: FxHashMap<u64, PersonRecord>,
    /// Lazily built sampling-weight distribution over keys
    weight_cdf: OnceLock<Cdf<u64>>,
}

impl Clone for Population {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            weight_cdf: OnceLock::new(),
        }
    }
}

impl Population {
    /// Create an empty population
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a population from records, keyed by their ids
    pub fn from_records<I: IntoIterator<Item = PersonRecord>>(records: I) -> Self {
        let mut population = Self::new();
        for record in records {
            population.insert(record);
        }
        population
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the population holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a record under its own id as key
    pub fn insert(&mut self, record: PersonRecord) {
        self.insert_keyed(record.id, record);
    }

    /// Insert a record under an explicit key
    pub fn insert_keyed(&mut self, key: u64, record: PersonRecord) {
        self.records.insert(key, record);
        self.weight_cdf = OnceLock::new();
    }

    /// Move all records of `other` into this population, keeping their keys
    pub fn merge(&mut self, other: Self) {
        for (key, record) in other.records {
            self.records.insert(key, record);
        }
        self.weight_cdf = OnceLock::new();
    }

    /// Iterate over records in ascending key order.
    ///
    /// Sorted iteration keeps every derived quantity independent of hash
    /// ordering, which seeded runs rely on.
    pub fn records(&self) -> impl Iterator<Item = &PersonRecord> {
        self.records
            .iter()
            .sorted_by_key(|(key, _)| **key)
            .map(|(_, record)| record)
    }

    /// Look up a record by key
    #[must_use]
    pub fn get(&self, key: u64) -> Option<&PersonRecord> {
        self.records.get(&key)
    }

    /// Records satisfying `keep`, with their keys preserved
    #[must_use]
    pub fn subsample<F: Fn(&PersonRecord) -> bool>(&self, keep: F) -> Self {
        let records: FxHashMap<u64, PersonRecord> = self
            .records
            .iter()
            .filter(|(_, record)| keep(record))
            .map(|(key, record)| (*key, record.clone()))
            .collect();
        Self {
            records,
            weight_cdf: OnceLock::new(),
        }
    }

    /// Weighted distribution of a selected attribute.
    ///
    /// Records where `select` returns `None` are skipped; masses are raw
    /// sampling weights, not normalized.
    pub fn make_pmf<V, F>(&self, select: F) -> Pmf<V>
    where
        V: Clone + Eq + Hash,
        F: Fn(&PersonRecord) -> Option<V>,
    {
        let mut pmf = Pmf::new();
        for record in self.records() {
            if let Some(value) = select(record) {
                pmf.incr(value, record.weight);
            }
        }
        pmf
    }

    /// Normalized age distribution at the start of `year`
    pub fn make_age_pmf(&self, year: i32) -> Result<Pmf<i32>> {
        let mut pmf = self.make_pmf(|record| record.age_at(year));
        pmf.normalize()?;
        Ok(pmf)
    }

    fn weight_cdf(&self) -> Result<&Cdf<u64>> {
        if let Some(cdf) = self.weight_cdf.get() {
            return Ok(cdf);
        }
        let cdf = Cdf::from_items(
            self.records
                .iter()
                .sorted_by_key(|(key, _)| **key)
                .map(|(key, record)| (*key, record.weight)),
        )?;
        Ok(self.weight_cdf.get_or_init(|| cdf))
    }

    /// Draw a bootstrap replicate of `n` records (default: current size),
    /// weighted by sampling weight, with replacement.
    ///
    /// Drawn clones are stored under keys `0..n`; their record ids are
    /// untouched.
    pub fn resample(&self, n: Option<usize>, rng: &mut StdRng) -> Result<Self> {
        let n = n.unwrap_or_else(|| self.len());
        let cdf = self.weight_cdf()?;

        let mut records = FxHashMap::default();
        records.reserve(n);
        for (i, key) in cdf.sample_many(n, rng).into_iter().enumerate() {
            records.insert(i as u64, self.records[&key].clone());
        }
        Ok(Self {
            records,
            weight_cdf: OnceLock::new(),
        })
    }

    /// Draw `n` records with replacement, reweighted so the resulting age
    /// distribution at `year` matches `target`.
    ///
    /// Each candidate's draw weight is the ratio of target to current age
    /// mass. Records with an unknown birth year, or whose age carries no
    /// mass in the current distribution, are excluded from the draw.
    pub fn resample_by_age(
        &self,
        n: usize,
        year: i32,
        target: &Pmf<i32>,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let current = self.make_age_pmf(year)?;

        let weights = self
            .records
            .iter()
            .sorted_by_key(|(key, _)| **key)
            .filter_map(|(key, record)| {
                let age = record.age_at(year)?;
                let current_mass = current.prob(&age);
                if current_mass == 0.0 {
                    return None;
                }
                Some((*key, target.prob(&age) / current_mass))
            });
        let cdf = Cdf::from_items(weights)?;

        let mut records = FxHashMap::default();
        records.reserve(n);
        for (i, key) in cdf.sample_many(n, rng).into_iter().enumerate() {
            records.insert(i as u64, self.records[&key].clone());
        }
        Ok(Self {
            records,
            weight_cdf: OnceLock::new(),
        })
    }

    /// Split the population by birth decade, dropping records with an
    /// unknown birth year. Keys are preserved within each partition.
    #[must_use]
    pub fn partition_by_decade(&self) -> BTreeMap<i32, Self> {
        let mut partitions: BTreeMap<i32, Self> = BTreeMap::new();
        for (key, record) in self.records.iter().sorted_by_key(|(key, _)| **key) {
            if let Some(decade) = record.decade() {
                partitions
                    .entry(decade)
                    .or_default()
                    .insert_keyed(*key, record.clone());
            }
        }
        partitions
    }

    /// Weighted shares of the substantive affiliation categories, in
    /// [`Affiliation::KNOWN`] order. Nonresponse is excluded before
    /// normalizing.
    pub fn affiliation_shares(&self) -> Result<[f64; 5]> {
        let mut pmf = self.make_pmf(|record| Some(record.affiliation));
        pmf.set(Affiliation::Unknown, 0.0);
        pmf.normalize()?;

        let mut shares = [0.0; 5];
        for (i, category) in Affiliation::KNOWN.iter().enumerate() {
            shares[i] = pmf.prob(category);
        }
        Ok(shares)
    }

    /// Number of records that were produced by simulation rather than
    /// observed in the survey
    #[must_use]
    pub fn synthetic_count(&self) -> usize {
        self.records
            .values()
            .filter(|record| RecordIdAllocator::is_synthetic(record.id))
            .count()
    }
}
