//! Run command - clean an extract, sample it and write both tables.

use std::path::PathBuf;

use colored::Colorize;
use stratify::output::{save_clean_table, save_sample, DEFAULT_OUTPUT_DELIMITER};
use stratify::{ParserConfig, SampleConfig, Stratify, StratifyConfig};

use super::{
    ensure_not_input, print_dropped, print_strata, sibling_path, CLEANED_FILE_NAME,
    SAMPLE_FILE_NAME,
};
use crate::cli::{Delimiter, SamplingArgs};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    cleaned_output: Option<PathBuf>,
    output: Option<PathBuf>,
    sampling: SamplingArgs,
    delimiter: Option<Delimiter>,
    report: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let mut parser = ParserConfig::default();
    if let Some(Delimiter(d)) = delimiter {
        parser = parser.with_delimiter(d);
    }
    let sample_config = SampleConfig::default()
        .with_total_samples(sampling.total_samples)
        .with_seed(sampling.seed);

    let stratify = Stratify::with_config(StratifyConfig {
        parser,
        sample: sample_config,
        ..StratifyConfig::default()
    })?;

    if !json {
        println!(
            "{} {}",
            "Reading".cyan().bold(),
            file.display().to_string().white()
        );
    }

    let result = stratify.run(&file)?;

    let cleaned_path = cleaned_output.unwrap_or_else(|| sibling_path(&file, CLEANED_FILE_NAME));
    let sample_path = output.unwrap_or_else(|| sibling_path(&file, SAMPLE_FILE_NAME));

    ensure_not_input(&file, &cleaned_path)?;
    ensure_not_input(&file, &sample_path)?;
    ensure_not_input(&cleaned_path, &sample_path)?;

    save_sample(&sample_path, &result.sample, DEFAULT_OUTPUT_DELIMITER)?;
    save_clean_table(&cleaned_path, &result.table, DEFAULT_OUTPUT_DELIMITER)?;

    let run_report = result.report(sample_config);
    if let Some(ref path) = report {
        run_report.save(path)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&run_report)?);
        return Ok(());
    }

    if verbose {
        println!(
            "  {} {} ({}, {}, {} columns)",
            "Source:".dimmed(),
            result.source.file,
            result.source.format,
            result.source.encoding,
            result.source.column_count
        );
        println!("  {} {}", "Hash:".dimmed(), result.source.hash.dimmed());
    }

    println!(
        "Cleaned {} entities",
        result.table.len().to_string().white().bold()
    );
    print_dropped(&result.table, verbose);

    println!(
        "Sampled {} entities (seed {})",
        result.sample.len().to_string().white().bold(),
        sample_config.seed
    );
    print_strata(&result.sample, verbose);

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        sample_path.display().to_string().white()
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        cleaned_path.display().to_string().white()
    );
    if let Some(path) = report {
        println!(
            "{} {}",
            "Report".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}
