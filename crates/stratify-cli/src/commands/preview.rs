//! Preview command - show the first rows of a delimited table.

use std::path::PathBuf;

use colored::Colorize;
use stratify::Parser;

pub fn run(file: PathBuf, rows: usize, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    // A missing file is expected here (e.g. a hand-merged sample not made yet).
    if !file.exists() {
        println!(
            "{} {}",
            "Table not found at".yellow(),
            file.display().to_string().white()
        );
        return Ok(());
    }

    let (table, source) = Parser::new().parse_file(&file)?;

    println!(
        "{} {}",
        "Preview of".cyan().bold(),
        source.file.white()
    );
    if verbose {
        println!(
            "  {} rows, {} columns ({}, {})",
            source.row_count, source.column_count, source.format, source.encoding
        );
    }
    println!();

    let shown = table.head(rows);
    let widths: Vec<usize> = (0..table.column_count())
        .map(|col| {
            shown
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(table.headers[col].chars().count()))
                .max()
                .unwrap_or(0)
                .min(40)
        })
        .collect();

    let header: Vec<String> = table
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:w$}", truncate(h, w), w = w))
        .collect();
    println!("{}", header.join("  ").bold());

    for row in shown {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:w$}", truncate(cell, w), w = w))
            .collect();
        println!("{}", cells.join("  "));
    }

    if table.row_count() > shown.len() {
        println!(
            "{}",
            format!("... {} more rows", table.row_count() - shown.len()).dimmed()
        );
    }

    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
