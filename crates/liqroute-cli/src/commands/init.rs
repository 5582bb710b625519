//! `liqroute init` — Write a default connector configuration.

use std::path::Path;

use clap::Args;

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {}",
            config_path.display()
        );
    }

    CliConfig::default().save(config_path)?;
    println!("Initialized connector configuration at {}", config_path.display());
    println!("Add the ledger pairs you operate under [[local_routes]].");
    println!("Run 'liqroute quote --help' to price a payment.");

    Ok(())
}
