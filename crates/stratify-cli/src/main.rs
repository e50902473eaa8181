//! Stratify CLI - reshape survey extracts and draw stratified samples.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            file,
            cleaned_output,
            output,
            sampling,
            delimiter,
            report,
            json,
        } => commands::run::run(
            file,
            cleaned_output,
            output,
            sampling,
            delimiter,
            report,
            json,
            cli.verbose,
        ),

        Commands::Clean {
            file,
            output,
            delimiter,
        } => commands::clean::run(file, output, delimiter, cli.verbose),

        Commands::Sample {
            file,
            output,
            sampling,
        } => commands::sample::run(file, output, sampling, cli.verbose),

        Commands::Preview { file, rows } => commands::preview::run(file, rows, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
