//! Tertile binning and stratified sampling.

mod sampler;
mod tertile;

pub use sampler::{SampleConfig, SampleRecord, SampleSet, StratifiedSampler, StratumSummary};
pub use tertile::{cut_probability, quantile_sorted, Tertile, TertileBounds};
