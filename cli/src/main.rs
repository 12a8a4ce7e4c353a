//! skyforecast - monthly protocol revenue forecasts from YAML scenarios
//!
//! - `run` resolves one scenario and prints monthly/quarterly results
//! - `validate` resolves every scenario in a config directory

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use forecast_core_rs::{resolve_scenario, ExtensionSet, ForecastEngine};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod loader;
mod output;

use loader::ConfigDir;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "skyforecast")]
#[command(about = "Monthly revenue forecast engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "SKYFORECAST_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario
    Run {
        /// Scenario name (file stem under <config-dir>/scenarios)
        scenario: String,

        #[arg(short, long, env = "SKYFORECAST_CONFIG", default_value = "config")]
        config_dir: PathBuf,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Include the month-by-month table
        #[arg(short, long)]
        detailed: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve every scenario and check extension settings
    Validate {
        #[arg(short, long, env = "SKYFORECAST_CONFIG", default_value = "config")]
        config_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            config_dir,
            format,
            detailed,
            output,
        } => run(&ConfigDir::new(config_dir), &scenario, format, detailed, output),
        Commands::Validate { config_dir } => validate(&ConfigDir::new(config_dir)),
    }
}

fn run(config: &ConfigDir, name: &str, format: OutputFormat, detailed: bool, output: Option<PathBuf>) -> Result<()> {
    let engine = ForecastEngine::from_settings(
        config.load_agents()?,
        config.load_constants()?,
        &config.load_extensions()?,
    )
    .context("building extensions")?;

    let scenarios = config.scenarios();
    let scenario_config = scenarios.load_required(name)?;
    let scenario = resolve_scenario(&scenario_config, &scenarios).with_context(|| format!("resolving '{name}'"))?;

    info!(
        scenario = %scenario.name,
        months = scenario.months,
        extensions = engine.extensions().len(),
        "running forecast"
    );
    let results = engine.run_scenario(&scenario)?;
    let rendered = output::render(&results, format, detailed)?;

    match output {
        Some(path) => {
            fs::write(&path, rendered).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn validate(config: &ConfigDir) -> Result<()> {
    config.load_agents()?;
    config.load_constants()?;
    let extensions = ExtensionSet::from_settings(&config.load_extensions()?)?;
    println!("✓ {} extension(s) configured", extensions.len());

    let scenarios = config.scenarios();
    let mut failures = 0;
    for name in scenarios.names()? {
        let outcome = scenarios
            .load_required(&name)
            .and_then(|cfg| resolve_scenario(&cfg, &scenarios).map_err(Into::into));
        match outcome {
            Ok(resolved) => println!("✓ {name} ({} months)", resolved.months),
            Err(e) => {
                error!(scenario = %name, "{e:#}");
                println!("✗ {name}: {e:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} scenario(s) failed validation");
    }
    Ok(())
}
