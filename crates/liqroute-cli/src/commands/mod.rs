pub mod export;
pub mod init;
pub mod quote;

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use liqroute_routing::{RouteAdvertisement, RoutingTable};
use tracing::info;

use crate::config::CliConfig;

/// Build the routing table from the configured local pairs, then apply any
/// peer advertisements read from `adverts` (a JSON array).
pub fn load_table(config: &CliConfig, adverts: Option<&Path>) -> anyhow::Result<RoutingTable> {
    let now = Utc::now();
    let mut table = RoutingTable::from_config(&config.connector, &config.local_routes, now)?;

    if let Some(path) = adverts {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading advertisements from {}", path.display()))?;
        let adverts: Vec<RouteAdvertisement> = serde_json::from_str(&contents)
            .with_context(|| format!("parsing advertisements in {}", path.display()))?;

        let mut accepted = 0;
        for advert in &adverts {
            if table.add_route(advert, now)? {
                accepted += 1;
            }
        }
        info!(received = adverts.len(), accepted, "applied peer advertisements");
    }

    Ok(table)
}
