#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for building-plan text extraction.
//!
//! Reads converted plan text from a file or stdin, runs one extractor (or
//! all of them) and prints the result as JSON. Log output goes to stderr
//! and is controlled by `RUST_LOG`.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use plan_extract::ExtractionOptions;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "plan_extract", about = "Building-plan metadata extraction tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Text file to read (defaults to stdin)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// TOML file with extraction options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Drop results whose text overlaps an earlier result (overrides the config file)
    #[arg(long, global = true)]
    dedupe: bool,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classified dimensions, in meters
    Dimensions {
        /// Print only the numeric values
        #[arg(long)]
        values: bool,
    },
    /// Window and door identifiers
    Identifiers,
    /// Window, door and ironmongery schedules
    Schedule,
    /// Schedule quality assessment
    Quality,
    /// Lintel, wall-plate and roof heights
    Structural,
    /// Areas in square meters
    Areas,
    /// Storey counts
    Floors,
    /// Grade of the input text itself
    TextQuality,
    /// Every extractor at once
    All,
}

#[derive(Serialize)]
struct Identifiers {
    windows: Vec<String>,
    doors: Vec<String>,
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn load_options(cli: &Cli) -> Result<ExtractionOptions, Box<dyn std::error::Error>> {
    let mut options = match &cli.config {
        Some(path) => {
            log::info!("Loading extraction options from {}", path.display());
            ExtractionOptions::from_toml_str(&std::fs::read_to_string(path)?)?
        }
        None => ExtractionOptions::default(),
    };
    if cli.dedupe {
        options.dedupe_overlapping = true;
    }
    Ok(options)
}

fn print_json(value: &impl Serialize, compact: bool) -> serde_json::Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let options = load_options(&cli)?;
    let text = read_input(cli.input.as_deref())?;
    log::debug!("Read {} bytes of input text", text.len());

    match cli.command {
        Commands::Dimensions { values: true } => print_json(
            &plan_extract::extract_dimension_values_with(&text, &options),
            cli.compact,
        )?,
        Commands::Dimensions { values: false } => print_json(
            &plan_extract::extract_dimensions_with(&text, &options),
            cli.compact,
        )?,
        Commands::Identifiers => print_json(
            &Identifiers {
                windows: plan_extract::extract_window_identifiers_with(&text, &options),
                doors: plan_extract::extract_door_identifiers_with(&text, &options),
            },
            cli.compact,
        )?,
        Commands::Schedule => print_json(
            &plan_extract::extract_schedule_info_with(&text, &options),
            cli.compact,
        )?,
        Commands::Quality => {
            let schedule = plan_extract::extract_schedule_info_with(&text, &options);
            print_json(
                &plan_extract::assess_schedule_quality(
                    &schedule.windows,
                    &schedule.doors,
                    &schedule.ironmongery,
                ),
                cli.compact,
            )?;
        }
        Commands::Structural => print_json(
            &plan_extract::extract_structural_heights(&text),
            cli.compact,
        )?,
        Commands::Areas => print_json(&plan_extract::extract_areas(&text), cli.compact)?,
        Commands::Floors => print_json(&plan_extract::extract_floor_count(&text), cli.compact)?,
        Commands::TextQuality => {
            print_json(&plan_extract::assess_text_quality(&text), cli.compact)?;
        }
        Commands::All => print_json(
            &plan_extract::extract_all_with(&text, &options),
            cli.compact,
        )?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "plan_extract",
            "schedule",
            "--input",
            "plan.txt",
            "--dedupe",
            "--compact",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Schedule));
        assert_eq!(cli.input, Some(PathBuf::from("plan.txt")));
        assert!(cli.dedupe);
        assert!(cli.compact);
    }

    #[test]
    fn dedupe_flag_overrides_defaults() {
        let cli = Cli::try_parse_from(["plan_extract", "all", "--dedupe"]).unwrap();
        assert_eq!(load_options(&cli).unwrap(), ExtractionOptions::deduplicated());

        let cli = Cli::try_parse_from(["plan_extract", "all"]).unwrap();
        assert_eq!(load_options(&cli).unwrap(), ExtractionOptions::default());
    }

    #[test]
    fn text_quality_subcommand_is_kebab_case() {
        let cli = Cli::try_parse_from(["plan_extract", "text-quality"]).unwrap();
        assert!(matches!(cli.command, Commands::TextQuality));
    }

    #[test]
    fn dimension_values_flag() {
        let cli = Cli::try_parse_from(["plan_extract", "dimensions", "--values"]).unwrap();
        assert!(matches!(cli.command, Commands::Dimensions { values: true }));
    }
}
