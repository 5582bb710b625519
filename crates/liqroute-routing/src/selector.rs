//! Best next-hop selection over the routes of one ledger pair.

use crate::route::RouteRecord;
use crate::table::RoutingTable;

/// The winning route for a ledger pair at a given amount.
#[derive(Debug, Clone, Copy)]
pub struct BestHop<'a> {
    pub connector: &'a str,
    /// Destination amount when selecting by source amount, source cost when
    /// selecting by destination amount.
    pub amount: f64,
    pub route: &'a RouteRecord,
}

impl RoutingTable {
    /// The route delivering the most on `destination` for `source_amount`
    /// sent on `source`. Ties go to the connector that sorts first, then to
    /// the path that sorts first.
    pub fn find_best_connector_for_source_amount(
        &self,
        source: &str,
        destination: &str,
        source_amount: f64,
    ) -> Option<BestHop<'_>> {
        let mut best: Option<BestHop<'_>> = None;
        for (connector, route) in self.routes_for(source, destination) {
            let amount = route.curve.amount_at(source_amount);
            if best.map_or(true, |b| amount > b.amount) {
                best = Some(BestHop {
                    connector,
                    amount,
                    route,
                });
            }
        }
        best
    }

    /// The route that delivers `destination_amount` on `destination` for
    /// the smallest cost on `source`. Routes without the capacity for
    /// the amount are skipped.
    pub fn find_best_connector_for_destination_amount(
        &self,
        source: &str,
        destination: &str,
        destination_amount: f64,
    ) -> Option<BestHop<'_>> {
        let mut best: Option<BestHop<'_>> = None;
        for (connector, route) in self.routes_for(source, destination) {
            let cost = route.curve.amount_reverse(destination_amount);
            if !cost.is_finite() {
                continue;
            }
            if best.map_or(true, |b| cost < b.amount) {
                best = Some(BestHop {
                    connector,
                    amount: cost,
                    route,
                });
            }
        }
        best
    }
}
