//! CLI command implementations.

pub mod clean;
pub mod preview;
pub mod run;
pub mod sample;

use std::path::{Path, PathBuf};

use colored::Colorize;
use stratify::{CleanTable, SampleSet};

pub const CLEANED_FILE_NAME: &str = "cleaned_income_data.csv";
pub const SAMPLE_FILE_NAME: &str = "random_county_sample.csv";

/// `name` placed in the same directory as `input`.
pub fn sibling_path(input: &Path, name: &str) -> PathBuf {
    input.with_file_name(name)
}

/// Refuse to write `output` over the file the command is reading.
///
/// Paths are compared after resolving symlinks and `..`, so a relative and an
/// absolute spelling of the same file are caught too.
pub fn ensure_not_input(input: &Path, output: &Path) -> Result<(), String> {
    if same_file(input, output) {
        return Err(format!(
            "Output {} would overwrite the input file; pass a different --output",
            output.display()
        ));
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

/// Canonical form of a path whose file may not exist yet.
fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = path.canonicalize() {
        return Some(resolved);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    parent.canonicalize().ok().map(|p| p.join(name))
}

/// Report entities dropped while cleaning.
pub fn print_dropped(table: &CleanTable, verbose: bool) {
    if !table.excluded.is_empty() && verbose {
        println!(
            "  {} aggregate/header entit{} excluded",
            table.excluded.len().to_string().white(),
            if table.excluded.len() == 1 { "y" } else { "ies" }
        );
        for entity in &table.excluded {
            println!("    {} {}", "•".dimmed(), entity.dimmed());
        }
    }

    if table.filtered.is_empty() {
        return;
    }

    println!(
        "{} {} entit{} dropped with a non-numeric estimate",
        "Warning:".yellow().bold(),
        table.filtered.len().to_string().yellow(),
        if table.filtered.len() == 1 { "y" } else { "ies" }
    );

    if verbose {
        for row in &table.filtered {
            println!(
                "    {} {} [{}] {}",
                "•".dimmed(),
                row.entity,
                row.raw_value.as_deref().unwrap_or("").cyan(),
                row.reason.label().dimmed()
            );
        }
    }
}

/// Per-stratum population and draw counts.
pub fn print_strata(sample: &SampleSet, verbose: bool) {
    if let Some(bounds) = sample.bounds {
        if verbose {
            println!(
                "  Tertile edges: {:.1} | {:.1} | {:.1} | {:.1}",
                bounds.min, bounds.lower, bounds.upper, bounds.max
            );
        }
        if bounds.has_duplicate_edges() {
            println!(
                "{} tertile edges collapse on tied incomes; some strata may be empty",
                "Warning:".yellow().bold()
            );
        }
    }

    for summary in &sample.strata {
        let short = summary.drawn < summary.target;
        let drawn = format!("{}/{}", summary.drawn, summary.target);
        println!(
            "  {:8} {:>7} drawn from {} {}",
            summary.tertile.label(),
            if short {
                drawn.yellow().to_string()
            } else {
                drawn.green().to_string()
            },
            summary.population,
            if short { "(stratum smaller than target)".dimmed().to_string() } else { String::new() }
        );
    }
}
