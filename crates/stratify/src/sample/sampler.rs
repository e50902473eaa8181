//! Tertile-stratified sampling without replacement.

use serde::{Deserialize, Serialize};

use super::tertile::{Tertile, TertileBounds};
use crate::error::{Result, StratifyError};
use crate::reshape::{CleanRecord, CleanTable};

/// Sampler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Upper bound on the combined sample size.
    pub total_samples: usize,
    /// Seed for the sampling generator.
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            total_samples: 100,
            seed: 42,
        }
    }
}

impl SampleConfig {
    pub fn with_total_samples(mut self, total_samples: usize) -> Self {
        self.total_samples = total_samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Requested draw per stratum: near-equal thirds, the remainder going
    /// to the upper strata (100 → 33/33/34).
    pub fn target(&self, tertile: Tertile) -> usize {
        let base = self.total_samples / 3;
        let remainder = self.total_samples % 3;
        match tertile {
            Tertile::Low => base,
            Tertile::Medium => base + usize::from(remainder >= 2),
            Tertile::High => base + usize::from(remainder >= 1),
        }
    }
}

/// A sampled row with its stratum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    #[serde(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Income")]
    pub income: f64,
    #[serde(rename = "MOE")]
    pub moe: String,
    #[serde(rename = "Tertile")]
    pub tertile: Tertile,
}

impl SampleRecord {
    fn from_clean(record: &CleanRecord, tertile: Tertile) -> Self {
        Self {
            entity: record.entity.clone(),
            income: record.income,
            moe: record.moe.clone(),
            tertile,
        }
    }
}

/// Population and draw counts for one stratum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StratumSummary {
    pub tertile: Tertile,
    pub population: usize,
    pub target: usize,
    pub drawn: usize,
}

/// Low, Medium and High sub-samples concatenated in that order.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    pub records: Vec<SampleRecord>,
    /// Edges used for binning; `None` for an empty input table.
    pub bounds: Option<TertileBounds>,
    pub strata: Vec<StratumSummary>,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sampled rows belonging to one stratum.
    pub fn stratum(&self, tertile: Tertile) -> impl Iterator<Item = &SampleRecord> {
        self.records.iter().filter(move |r| r.tertile == tertile)
    }
}

/// Draws a fixed-size sample balanced across income tertiles.
pub struct StratifiedSampler {
    config: SampleConfig,
}

impl StratifiedSampler {
    /// Create a sampler with default configuration.
    pub fn new() -> Self {
        Self::with_config(SampleConfig::default())
    }

    /// Create a sampler with custom configuration.
    pub fn with_config(config: SampleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    /// Label every row of the table with its tertile.
    pub fn assign_tertiles(&self, table: &CleanTable) -> Option<(TertileBounds, Vec<Tertile>)> {
        let bounds = TertileBounds::compute(&table.incomes())?;
        let tertiles = table.iter().map(|r| bounds.classify(r.income)).collect();
        Some((bounds, tertiles))
    }

    /// Sample using a fresh generator seeded from the configuration.
    pub fn sample(&self, table: &CleanTable) -> Result<SampleSet> {
        let mut rng = fastrand::Rng::with_seed(self.config.seed);
        self.sample_with_rng(table, &mut rng)
    }

    /// Sample using a caller-supplied generator.
    ///
    /// Strata are drawn in order Low, Medium, High from the same generator,
    /// so the result depends only on the table and the generator's state.
    pub fn sample_with_rng(&self, table: &CleanTable, rng: &mut fastrand::Rng) -> Result<SampleSet> {
        if let Some(bad) = table.iter().find(|r| !r.income.is_finite()) {
            return Err(StratifyError::Config(format!(
                "income for '{}' is not finite",
                bad.entity
            )));
        }

        let Some((bounds, tertiles)) = self.assign_tertiles(table) else {
            return Ok(SampleSet {
                strata: Tertile::ALL
                    .iter()
                    .map(|&tertile| StratumSummary {
                        tertile,
                        population: 0,
                        target: self.config.target(tertile),
                        drawn: 0,
                    })
                    .collect(),
                ..SampleSet::default()
            });
        };

        let mut set = SampleSet {
            bounds: Some(bounds),
            ..SampleSet::default()
        };

        for tertile in Tertile::ALL {
            let members: Vec<&CleanRecord> = table
                .iter()
                .zip(&tertiles)
                .filter(|(_, t)| **t == tertile)
                .map(|(r, _)| r)
                .collect();

            let target = self.config.target(tertile);
            let n = target.min(members.len());

            for index in draw_without_replacement(members.len(), n, rng) {
                set.records
                    .push(SampleRecord::from_clean(members[index], tertile));
            }

            set.strata.push(StratumSummary {
                tertile,
                population: members.len(),
                target,
                drawn: n,
            });
        }

        Ok(set)
    }
}

impl Default for StratifiedSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick `n` distinct indices from `0..population` in draw order.
///
/// Partial Fisher–Yates: only the first `n` slots are shuffled.
fn draw_without_replacement(population: usize, n: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..population).collect();
    let n = n.min(population);
    for i in 0..n {
        let j = rng.usize(i..population);
        indices.swap(i, j);
    }
    indices.truncate(n);
    indices
}
