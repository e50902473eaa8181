//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stratify: tidy a wide survey extract and draw an income-stratified sample
#[derive(Parser)]
#[command(name = "stratify")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean an extract and draw the stratified sample
    Run {
        /// Path to the wide extract (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the cleaned table (default: cleaned_income_data.csv next to FILE)
        #[arg(long)]
        cleaned_output: Option<PathBuf>,

        /// Output path for the sample (default: random_county_sample.csv next to FILE)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        sampling: SamplingArgs,

        /// Input delimiter (auto-detected when omitted)
        #[arg(short, long)]
        delimiter: Option<Delimiter>,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the run report as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Reshape an extract into the cleaned per-entity table only
    Clean {
        /// Path to the wide extract (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: cleaned_income_data.csv next to FILE)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input delimiter (auto-detected when omitted)
        #[arg(short, long)]
        delimiter: Option<Delimiter>,
    },

    /// Draw a stratified sample from an already cleaned table
    Sample {
        /// Path to a cleaned table (Entity,Income,MOE)
        #[arg(value_name = "CLEANED_FILE")]
        file: PathBuf,

        /// Output path (default: random_county_sample.csv next to CLEANED_FILE)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Print the first rows of a delimited table
    Preview {
        /// Path to any delimited table
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value = "5")]
        rows: usize,
    },
}

/// Sampling parameters shared by `run` and `sample`.
#[derive(clap::Args, Clone, Debug)]
pub struct SamplingArgs {
    /// Total sample size, split into near-equal thirds
    #[arg(long, default_value = "100")]
    pub total_samples: usize,

    /// Seed for the sampling generator
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

/// Field delimiter for input files.
#[derive(Clone, Copy, Debug)]
pub struct Delimiter(pub u8);

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab" | "tsv" | "\\t" => Ok(Delimiter(b'\t')),
            "comma" | "csv" | "," => Ok(Delimiter(b',')),
            "semicolon" | ";" => Ok(Delimiter(b';')),
            "pipe" | "|" => Ok(Delimiter(b'|')),
            _ => Err(format!(
                "Unknown delimiter: {}. Use tab, comma, semicolon, or pipe.",
                s
            )),
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            b'\t' => write!(f, "tab"),
            b',' => write!(f, "comma"),
            b';' => write!(f, "semicolon"),
            b'|' => write!(f, "pipe"),
            other => write!(f, "{:?}", other as char),
        }
    }
}
