//! Stratify: tidy a wide survey extract and draw an income-stratified sample.
//!
//! Census-style extracts arrive as a single row whose column headers encode
//! both the geography and the measurement (`"Autauga County, Alabama!!Estimate"`).
//! Stratify turns that into one row per entity with a numeric estimate and its
//! margin of error, then samples evenly from the low, medium and high income
//! tertiles.
//!
//! # Example
//!
//! ```no_run
//! use stratify::Stratify;
//!
//! let stratify = Stratify::new();
//! let result = stratify.run("ACS_extract.csv").unwrap();
//!
//! println!("Entities: {}", result.table.len());
//! println!("Sampled: {}", result.sample.len());
//! ```

pub mod error;
pub mod input;
pub mod output;
pub mod reshape;
pub mod sample;

mod stratify;

pub use crate::stratify::{RunReport, RunResult, Stratify, StratifyConfig};
pub use error::{Result, StratifyError, StructuralError};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata, TextEncoding};
pub use reshape::{CleanRecord, CleanTable, FilterReason, FilteredRow, RawRecord, ReshapeConfig, Reshaper};
pub use sample::{
    SampleConfig, SampleRecord, SampleSet, StratifiedSampler, StratumSummary, Tertile, TertileBounds,
};
