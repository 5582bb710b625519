//! `liqroute quote` — Quote a payment between two addresses.

use std::path::PathBuf;

use clap::{ArgGroup, Args};

use crate::config::CliConfig;

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("amount")
        .required(true)
        .args(["source_amount", "destination_amount"]),
))]
pub struct QuoteArgs {
    /// Sending address (ledger prefix + account).
    #[arg(short, long)]
    pub source: String,

    /// Receiving address (ledger prefix + account).
    #[arg(short, long)]
    pub destination: String,

    /// Amount to send; the quote reports what arrives.
    #[arg(long)]
    pub source_amount: Option<String>,

    /// Amount to deliver; the quote reports what it costs.
    #[arg(long)]
    pub destination_amount: Option<String>,

    /// JSON file of peer route advertisements to apply first.
    #[arg(short, long)]
    pub adverts: Option<PathBuf>,
}

pub fn run(args: &QuoteArgs, config: &CliConfig) -> anyhow::Result<()> {
    let table = super::load_table(config, args.adverts.as_deref())?;

    let quote = match (&args.source_amount, &args.destination_amount) {
        (Some(amount), _) => table.quote_by_source_amount(&args.source, &args.destination, amount)?,
        (None, Some(amount)) => {
            table.quote_by_destination_amount(&args.source, &args.destination, amount)?
        }
        (None, None) => anyhow::bail!("either --source-amount or --destination-amount is required"),
    };

    match quote {
        Some(quote) => println!("{}", serde_json::to_string_pretty(&quote)?),
        None => {
            println!(
                "No route from {} to {} for that amount.",
                args.source, args.destination
            );
        }
    }

    Ok(())
}
