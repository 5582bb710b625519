//! `liqroute export` — Print the routes this connector would broadcast.

use std::path::PathBuf;

use clap::Args;
use liqroute_routing::create_readvertisement;

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// JSON file of peer route advertisements to apply first.
    #[arg(short, long)]
    pub adverts: Option<PathBuf>,

    /// Point budget per curve (defaults to the configured value).
    #[arg(long)]
    pub max_points: Option<usize>,

    /// Print one combined route per ledger pair, as re-advertised to peers.
    #[arg(long)]
    pub combined: bool,
}

pub fn run(args: &ExportArgs, config: &CliConfig) -> anyhow::Result<()> {
    let table = super::load_table(config, args.adverts.as_deref())?;
    let max_points = args.max_points.unwrap_or(config.connector.export_max_points);

    let routes = if args.combined {
        create_readvertisement(&table, max_points)
    } else {
        table.export(max_points)
    };

    println!("{}", serde_json::to_string_pretty(&routes)?);
    Ok(())
}
