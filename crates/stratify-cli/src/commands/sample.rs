//! Sample command - draw a stratified sample from a cleaned table.

use std::path::PathBuf;

use colored::Colorize;
use stratify::output::{load_clean_table, save_sample, DEFAULT_OUTPUT_DELIMITER};
use stratify::{SampleConfig, StratifiedSampler};

use super::{ensure_not_input, print_strata, sibling_path, SAMPLE_FILE_NAME};
use crate::cli::SamplingArgs;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    sampling: SamplingArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Cleaned table not found: {}", file.display()).into());
    }

    let table = load_clean_table(&file, DEFAULT_OUTPUT_DELIMITER)?;
    if table.is_empty() {
        println!(
            "{} {} has no rows; the sample will be empty.",
            "Warning:".yellow().bold(),
            file.display()
        );
    }

    let config = SampleConfig::default()
        .with_total_samples(sampling.total_samples)
        .with_seed(sampling.seed);
    let sample = StratifiedSampler::with_config(config).sample(&table)?;

    println!(
        "Sampled {} of {} entities (seed {})",
        sample.len().to_string().white().bold(),
        table.len(),
        config.seed
    );
    print_strata(&sample, verbose);

    let output_path = output.unwrap_or_else(|| sibling_path(&file, SAMPLE_FILE_NAME));
    ensure_not_input(&file, &output_path)?;
    save_sample(&output_path, &sample, DEFAULT_OUTPUT_DELIMITER)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
