//! Example: Clean a wide extract and summarize the tertile sample.
//!
//! Usage:
//!   cargo run --example summarize -- <file_path> [seed]
//!
//! Example:
//!   cargo run --example summarize -- ACSST5Y2022.S1901.csv 42

use std::env;
use std::path::Path;

use stratify::{SampleConfig, Stratify, StratifyConfig, Tertile};

fn main() -> stratify::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example summarize -- <file_path> [seed]");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let seed: u64 = match args.get(2) {
        Some(s) => s
            .parse()
            .map_err(|_| stratify::StratifyError::Config(format!("invalid seed: {}", s)))?,
        None => 42,
    };

    let stratify = Stratify::with_config(StratifyConfig {
        sample: SampleConfig::default().with_seed(seed),
        ..StratifyConfig::default()
    })?;
    let result = stratify.run(path)?;

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("{} ({})", result.source.file, result.source.hash);
    println!("{}", separator);
    println!();
    println!("Entities:  {}", result.table.len());
    println!("Excluded:  {}", result.table.excluded.len());
    println!("Filtered:  {}", result.table.filtered.len());

    if let Some(bounds) = result.sample.bounds {
        println!();
        println!(
            "Tertile edges: {:.0} / {:.0} / {:.0} / {:.0}",
            bounds.min, bounds.lower, bounds.upper, bounds.max
        );
    }

    println!();
    for tertile in Tertile::ALL {
        let rows: Vec<_> = result.sample.stratum(tertile).collect();
        let mean = if rows.is_empty() {
            0.0
        } else {
            rows.iter().map(|r| r.income).sum::<f64>() / rows.len() as f64
        };
        println!("{:8} n={:3}  mean income {:>10.0}", tertile.label(), rows.len(), mean);
    }

    Ok(())
}
