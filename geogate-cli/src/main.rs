//! GeoGate CLI - Command-line interface
//!
//! This binary provides a command-line interface to the GeoGate library:
//! asset lookups around a point or inside a box, distances, and proximity
//! checks for field reports.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geogate::config::{config_file_path, ConfigFile};
use geogate::logging::init_logging;

use commands::{
    bounds::BoundsArgs, config::ConfigCommands, distance::DistanceArgs, nearby::NearbyArgs,
    verify::VerifyArgs,
};
use error::CliError;

#[derive(Parser)]
#[command(name = "geogate")]
#[command(version = geogate::VERSION)]
#[command(about = "Find nearby assets and verify reporters are on site", long_about = None)]
struct Cli {
    /// Asset export to load (file path or http(s) URL); overrides [source] in config
    #[arg(long, global = true)]
    source: Option<String>,

    /// Configuration file (default: ~/.geogate/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List assets within a radius of a point
    Nearby(NearbyArgs),

    /// List assets inside a bounding box
    Bounds(BoundsArgs),

    /// Great-circle distance between two points
    Distance(DistanceArgs),

    /// Check whether a reporter is close enough to an asset, optionally
    /// submitting a report
    Verify(VerifyArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);

    // Config management works without a valid config or a runtime
    let command = match cli.command {
        Commands::Config { action } => return commands::config::run(action, &config_path),
        command => command,
    };

    let config = ConfigFile::load_from(&config_path)?;

    let level = if cli.verbose { "debug" } else { "warn" };
    let _logging_guard = init_logging(&config.logging.directory, &config.logging.file, level)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let source = cli.source.as_deref();

    runtime.block_on(async move {
        match command {
            Commands::Nearby(args) => commands::nearby::run(args, &config, source).await,
            Commands::Bounds(args) => commands::bounds::run(args, &config, source).await,
            Commands::Distance(args) => commands::distance::run(args),
            Commands::Verify(args) => commands::verify::run(args, config, source).await,
            Commands::Config { .. } => Ok(()),
        }
    })
}
