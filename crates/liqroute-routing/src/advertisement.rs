use liqroute_core::{Curve, Point};
use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::table::RoutingTable;

/// Opaque metadata a connector attaches to its routes (rate info, fees…).
pub type PeerInfo = serde_json::Map<String, serde_json::Value>;

/// A single-hop route announcement, as configured locally or received from a
/// peer connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAdvertisement {
    /// Ledger the hop takes value from.
    pub source_ledger: String,
    /// Ledger the hop delivers value into.
    pub destination_ledger: String,
    /// Connector operating the hop.
    pub connector: String,
    /// Upper bound, in seconds, on the time the hop takes to forward a message.
    #[serde(default)]
    pub min_message_window: u32,
    /// The connector's account on the source ledger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
    /// The connector's account on the destination ledger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_account: Option<String>,
    /// Liquidity curve of the hop.
    pub points: Vec<Point>,
    #[serde(default, alias = "additional_info", skip_serializing_if = "Option::is_none")]
    pub peer_info: Option<PeerInfo>,
}

impl RouteAdvertisement {
    /// Create an advertisement with a one-second message window and no
    /// account hints.
    pub fn new(
        source_ledger: impl Into<String>,
        destination_ledger: impl Into<String>,
        connector: impl Into<String>,
        points: Vec<Point>,
    ) -> Self {
        Self {
            source_ledger: source_ledger.into(),
            destination_ledger: destination_ledger.into(),
            connector: connector.into(),
            min_message_window: 1,
            source_account: None,
            destination_account: None,
            points,
            peer_info: None,
        }
    }

    pub fn with_min_message_window(mut self, seconds: u32) -> Self {
        self.min_message_window = seconds;
        self
    }

    pub fn with_accounts(
        mut self,
        source_account: Option<String>,
        destination_account: Option<String>,
    ) -> Self {
        self.source_account = source_account;
        self.destination_account = destination_account;
        self
    }

    pub fn with_peer_info(mut self, peer_info: PeerInfo) -> Self {
        self.peer_info = Some(peer_info);
        self
    }

    /// Validate the advertisement and build its curve.
    pub fn validate(&self) -> Result<Curve, RoutingError> {
        if self.connector.is_empty() {
            return Err(RoutingError::InvalidAdvertisement {
                reason: "connector is empty".into(),
            });
        }
        if self.source_ledger.is_empty() || self.destination_ledger.is_empty() {
            return Err(RoutingError::InvalidAdvertisement {
                reason: "source and destination ledgers must be set".into(),
            });
        }
        if self.source_ledger == self.destination_ledger {
            return Err(RoutingError::InvalidAdvertisement {
                reason: format!("route from {} to itself", self.source_ledger),
            });
        }
        Curve::new(self.points.clone()).map_err(|e| RoutingError::InvalidAdvertisement {
            reason: format!(
                "{} -> {} via {}: {e}",
                self.source_ledger, self.destination_ledger, self.connector
            ),
        })
    }
}

/// A route as handed to the broadcast transport: the curve is simplified and
/// only the fields peers need are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRoute {
    pub source_ledger: String,
    pub destination_ledger: String,
    pub connector: String,
    pub min_message_window: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
    pub points: Vec<Point>,
}

/// Build the re-broadcast summary of everything this connector can reach:
/// one route per (source, destination) pair, advertised under our own
/// connector id, whose curve is the best of every next hop we know for it.
pub fn create_readvertisement(table: &RoutingTable, max_points: usize) -> Vec<ExportedRoute> {
    let mut routes: Vec<ExportedRoute> = table
        .pairs()
        .map(|(source, destination, pair)| {
            let (curve, min_message_window) = pair.values().fold(
                (Curve::default(), 0u32),
                |(curve, window), route| {
                    (
                        curve.combine(&route.curve),
                        window.max(route.min_message_window),
                    )
                },
            );
            ExportedRoute {
                source_ledger: source.to_string(),
                destination_ledger: destination.to_string(),
                connector: table.connector_id().to_string(),
                min_message_window,
                source_account: table.local_account(source).map(str::to_string),
                points: curve
                    .simplify_with(table.simplifier(), max_points)
                    .points()
                    .to_vec(),
            }
        })
        .collect();

    routes.sort_by(|a, b| {
        (a.source_ledger.as_str(), a.destination_ledger.as_str())
            .cmp(&(b.source_ledger.as_str(), b.destination_ledger.as_str()))
    });
    routes
}
