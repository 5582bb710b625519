use liqroute_core::{format_amount, parse_amount};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::advertisement::PeerInfo;
use crate::error::RoutingError;
use crate::route::RouteRecord;
use crate::selector::BestHop;
use crate::table::RoutingTable;

/// The priced first hop of a payment from a source address to a final
/// address. Amounts are decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// True when the first hop delivers straight into the final ledger.
    pub is_final: bool,
    /// Connector to hand the payment to on the destination ledger.
    pub connector: String,
    pub source_ledger: String,
    pub source_amount: String,
    /// Ledger the first hop delivers into.
    pub destination_ledger: String,
    pub destination_amount: String,
    /// Account to credit on the destination ledger; null on the final hop.
    #[serde(default)]
    pub destination_credit_account: Option<String>,
    pub final_ledger: String,
    pub final_amount: String,
    pub min_message_window: u32,
    /// Metadata of the pair we operate; null unless the hop is final.
    #[serde(default)]
    pub peer_info: Option<PeerInfo>,
}

impl RoutingTable {
    /// Quote delivering as much as possible to `final_address` for
    /// `source_amount` sent from `source_address`.
    ///
    /// Returns `Ok(None)` when no route reaches the final ledger.
    pub fn quote_by_source_amount(
        &self,
        source_address: &str,
        final_address: &str,
        source_amount: &str,
    ) -> Result<Option<Quote>, RoutingError> {
        let amount = parse_amount(source_amount)?;
        let Some((source, destination)) = self.resolve_ledgers(source_address, final_address)
        else {
            return Ok(None);
        };
        let Some(best) = self.find_best_connector_for_source_amount(source, destination, amount)
        else {
            return Ok(None);
        };
        let Some(first_leg) = self.first_leg(source, best.route) else {
            return Ok(None);
        };

        let final_amount = format_amount(best.amount);
        let destination_amount = if best.route.hop_count() == 1 {
            final_amount.clone()
        } else {
            format_amount(first_leg.curve.amount_at(amount))
        };

        Ok(Some(build_quote(
            &best,
            first_leg,
            format_amount(amount),
            destination_amount,
            final_amount,
        )))
    }

    /// Quote the cheapest way to deliver `final_amount` to `final_address`
    /// from `source_address`.
    ///
    /// Returns `Ok(None)` when no route reaches the final ledger or none has
    /// the capacity for the amount.
    pub fn quote_by_destination_amount(
        &self,
        source_address: &str,
        final_address: &str,
        final_amount: &str,
    ) -> Result<Option<Quote>, RoutingError> {
        let amount = parse_amount(final_amount)?;
        let Some((source, destination)) = self.resolve_ledgers(source_address, final_address)
        else {
            return Ok(None);
        };
        let Some(best) =
            self.find_best_connector_for_destination_amount(source, destination, amount)
        else {
            return Ok(None);
        };
        let Some(first_leg) = self.first_leg(source, best.route) else {
            return Ok(None);
        };

        let final_amount = format_amount(amount);
        let destination_amount = if best.route.hop_count() == 1 {
            final_amount.clone()
        } else {
            format_amount(first_leg.curve.amount_at(best.amount))
        };

        Ok(Some(build_quote(
            &best,
            first_leg,
            format_amount(best.amount),
            destination_amount,
            final_amount,
        )))
    }

    fn resolve_ledgers(&self, source_address: &str, final_address: &str) -> Option<(&str, &str)> {
        let Some(source) = self.resolve_source_ledger(source_address) else {
            debug!(source_address, "no route from unknown source ledger");
            return None;
        };
        let Some(destination) = self.resolve_destination_ledger(source, final_address) else {
            debug!(source, final_address, "no route to final ledger");
            return None;
        };
        Some((source, destination))
    }

    /// The configured pair a route starts with.
    fn first_leg(&self, source: &str, route: &RouteRecord) -> Option<&RouteRecord> {
        let leg = self.local_pair(source, route.next_ledger());
        if leg.is_none() {
            warn!(
                source,
                next = route.next_ledger(),
                "route does not start with a configured pair"
            );
        }
        leg
    }
}

fn build_quote(
    best: &BestHop<'_>,
    first_leg: &RouteRecord,
    source_amount: String,
    destination_amount: String,
    final_amount: String,
) -> Quote {
    let route = best.route;
    let is_final = route.hop_count() == 1;
    Quote {
        is_final,
        connector: best.connector.to_string(),
        source_ledger: route.source_ledger().to_string(),
        source_amount,
        destination_ledger: route.next_ledger().to_string(),
        destination_amount,
        destination_credit_account: if is_final {
            None
        } else {
            route.credit_account.clone()
        },
        final_ledger: route.destination_ledger().to_string(),
        final_amount,
        min_message_window: route.min_message_window,
        peer_info: if is_final {
            first_leg.peer_info.clone()
        } else {
            None
        },
    }
}
