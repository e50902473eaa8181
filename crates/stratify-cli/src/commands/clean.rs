//! Clean command - reshape an extract into the per-entity table.

use std::path::PathBuf;

use colored::Colorize;
use stratify::output::{save_clean_table, DEFAULT_OUTPUT_DELIMITER};
use stratify::{ParserConfig, Stratify, StratifyConfig};

use super::{ensure_not_input, print_dropped, sibling_path, CLEANED_FILE_NAME};
use crate::cli::Delimiter;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    delimiter: Option<Delimiter>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let mut parser = ParserConfig::default();
    if let Some(Delimiter(d)) = delimiter {
        parser = parser.with_delimiter(d);
    }
    let stratify = Stratify::with_config(StratifyConfig {
        parser,
        ..StratifyConfig::default()
    })?;

    println!(
        "{} {}",
        "Cleaning".cyan().bold(),
        file.display().to_string().white()
    );

    let (table, source) = stratify.clean(&file)?;

    if verbose {
        println!(
            "  {} {} labels ({}, {})",
            "Source:".dimmed(),
            source.column_count,
            source.format,
            source.encoding
        );
    }

    println!("Cleaned {} entities", table.len().to_string().white().bold());
    print_dropped(&table, verbose);

    let output_path = output.unwrap_or_else(|| sibling_path(&file, CLEANED_FILE_NAME));
    ensure_not_input(&file, &output_path)?;
    save_clean_table(&output_path, &table, DEFAULT_OUTPUT_DELIMITER)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
