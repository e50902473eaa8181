//! Main Stratify struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::output;
use crate::reshape::{CleanTable, FilteredRow, ReshapeConfig, Reshaper};
use crate::sample::{SampleConfig, SampleSet, StratifiedSampler, StratumSummary, TertileBounds};

/// Configuration for a full reshape-and-sample run.
#[derive(Debug, Clone, Default)]
pub struct StratifyConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Label splitting, metric selection and entity exclusion.
    pub reshape: ReshapeConfig,
    /// Sample size and seed.
    pub sample: SampleConfig,
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// The tidy per-entity table.
    pub table: CleanTable,
    /// The stratified sample drawn from `table`.
    pub sample: SampleSet,
}

/// Serializable summary of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub source: SourceMetadata,
    pub sample_config: SampleConfig,
    /// Entities in the clean table.
    pub entities: usize,
    /// Entities dropped by the exclusion pattern.
    pub excluded: Vec<String>,
    /// Entities dropped for a bad estimate.
    pub filtered: Vec<FilteredRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<TertileBounds>,
    pub strata: Vec<StratumSummary>,
    /// Rows in the sample.
    pub sampled: usize,
}

impl RunResult {
    /// Summarize the run for reporting.
    pub fn report(&self, sample_config: SampleConfig) -> RunReport {
        RunReport {
            source: self.source.clone(),
            sample_config,
            entities: self.table.len(),
            excluded: self.table.excluded.clone(),
            filtered: self.table.filtered.clone(),
            bounds: self.sample.bounds,
            strata: self.sample.strata.clone(),
            sampled: self.sample.len(),
        }
    }
}

impl RunReport {
    /// Save the report as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = output::create_file(path.as_ref())?;
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Reads a wide extract, reshapes it and draws the stratified sample.
pub struct Stratify {
    config: StratifyConfig,
    parser: Parser,
    reshaper: Reshaper,
    sampler: StratifiedSampler,
}

impl Stratify {
    /// Create an instance with default configuration.
    pub fn new() -> Self {
        Self {
            config: StratifyConfig::default(),
            parser: Parser::new(),
            reshaper: Reshaper::new(),
            sampler: StratifiedSampler::new(),
        }
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: StratifyConfig) -> Result<Self> {
        let parser = Parser::with_config(config.parser.clone());
        let reshaper = Reshaper::with_config(config.reshape.clone())?;
        let sampler = StratifiedSampler::with_config(config.sample);

        Ok(Self {
            config,
            parser,
            reshaper,
            sampler,
        })
    }

    pub fn config(&self) -> &StratifyConfig {
        &self.config
    }

    /// Parse and reshape a file into the clean table.
    pub fn clean(&self, path: impl AsRef<Path>) -> Result<(CleanTable, SourceMetadata)> {
        let (data, source) = self.parser.parse_file(path)?;
        let table = self.reshaper.reshape_table(&data)?;
        Ok((table, source))
    }

    /// Draw the stratified sample from an already clean table.
    pub fn sample(&self, table: &CleanTable) -> Result<SampleSet> {
        self.sampler.sample(table)
    }

    /// Clean then sample.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<RunResult> {
        let (table, source) = self.clean(path)?;
        let sample = self.sample(&table)?;

        Ok(RunResult {
            source,
            table,
            sample,
        })
    }
}

impl Default for Stratify {
    fn default() -> Self {
        Self::new()
    }
}
