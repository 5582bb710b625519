//! Liqroute CLI — inspect a connector's routing table from the command line.
//!
//! Subcommands: init, quote, export.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::CliConfig;

/// Liqroute — rate quoting and path selection for ledger connectors.
#[derive(Parser, Debug)]
#[command(name = "liqroute", version, about, long_about = None)]
struct Cli {
    /// Path to the connector configuration file.
    #[arg(short, long, global = true, default_value = "liqroute.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error). Overrides the config file;
    /// RUST_LOG overrides both.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default connector configuration.
    Init(commands::init::InitArgs),
    /// Quote a payment between two addresses.
    Quote(commands::quote::QuoteArgs),
    /// Print the routes this connector would broadcast to its peers.
    Export(commands::export::ExportArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(&cli.config)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, &config.logging.format);

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config),
        Commands::Quote(args) => commands::quote::run(args, &config),
        Commands::Export(args) => commands::export::run(args, &config),
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
