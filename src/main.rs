//! Marabunta - Main entry point
//!
//! Thin wrapper around the library: load a descriptor, compile it, report.
//! Nothing is executed.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use marabunta::cli::{Cli, Commands};
use marabunta::{Config, DescriptorParser, MigrationPlan, YAML_EXAMPLE};

/// Initialize the logger with appropriate settings
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    // RUST_LOG overrides the default level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_plan(path: &Path, config: Config) -> Result<MigrationPlan> {
    let parser = DescriptorParser::new(config)
        .load_from_file(path)
        .with_context(|| format!("Failed to read migration descriptor {:?}", path))?;
    let plan = parser
        .parse()
        .with_context(|| format!("Invalid migration descriptor {:?}", path))?;
    Ok(plan)
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config();

    match cli.command {
        Commands::Validate { file } => {
            info!("Validating migration descriptor: {:?}", file);
            let plan = load_plan(&file, config)?;
            let count = plan.len();
            println!(
                "✓ Migration descriptor is valid: {:?} ({} version{})",
                file,
                count,
                if count == 1 { "" } else { "s" }
            );
        }
        Commands::Plan { file, json } => {
            let plan = load_plan(&file, config)?;
            if json {
                let output = serde_json::to_string_pretty(&plan)
                    .context("Failed to serialize migration plan to JSON")?;
                println!("{}", output);
            } else {
                println!("{}", plan.summary());
            }
        }
        Commands::Example => {
            println!("{}", YAML_EXAMPLE.trim_start());
        }
    }

    Ok(())
}

/// Main application entry point
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}
