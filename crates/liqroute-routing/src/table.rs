use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use liqroute_core::{CurveSimplifier, TableConfig, VisvalingamWhyatt};
use tracing::{debug, info};

use crate::advertisement::{ExportedRoute, RouteAdvertisement};
use crate::composer::RouteComposer;
use crate::error::RoutingError;
use crate::route::{RouteKey, RouteRecord};

/// Routes for one (source, destination) pair, keyed by next-hop connector
/// and ledger path.
pub type PairRoutes = BTreeMap<RouteKey, RouteRecord>;

/// source ledger -> destination ledger -> (connector, path) -> route.
pub(crate) type RouteMap = BTreeMap<String, BTreeMap<String, PairRoutes>>;

/// The routing table of a single connector.
///
/// Holds the ledger pairs this connector operates itself plus every route
/// composed from them and from peer advertisements. All mutation goes
/// through `&mut self`; callers sharing a table across threads wrap it in a
/// lock of their choosing.
pub struct RoutingTable {
    connector_id: String,
    max_age: chrono::Duration,
    routes: RouteMap,
    /// Our own account on each ledger we operate a pair on.
    local_accounts: BTreeMap<String, String>,
    simplifier: Arc<dyn CurveSimplifier>,
}

impl RoutingTable {
    /// Create a table for `connector_id` and install `local_routes` as the
    /// ledger pairs it operates. Peer routes expire `max_age` after they
    /// were last advertised.
    pub fn new(
        connector_id: impl Into<String>,
        local_routes: &[RouteAdvertisement],
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, RoutingError> {
        let connector_id = connector_id.into();
        if connector_id.is_empty() {
            return Err(RoutingError::InvalidArgument(
                "connector id must not be empty".into(),
            ));
        }
        if max_age.is_zero() {
            return Err(RoutingError::InvalidArgument(
                "route max age must be positive".into(),
            ));
        }
        let max_age = chrono::Duration::from_std(max_age)
            .map_err(|e| RoutingError::InvalidArgument(format!("route max age: {e}")))?;

        let mut table = Self {
            connector_id,
            max_age,
            routes: RouteMap::new(),
            local_accounts: BTreeMap::new(),
            simplifier: Arc::new(VisvalingamWhyatt),
        };
        table.add_local_routes(local_routes, now)?;
        Ok(table)
    }

    /// Create a table from configuration.
    pub fn from_config(
        config: &TableConfig,
        local_routes: &[RouteAdvertisement],
        now: DateTime<Utc>,
    ) -> Result<Self, RoutingError> {
        config.validate()?;
        Self::new(config.connector_id.clone(), local_routes, config.max_age(), now)
    }

    /// Replace the curve simplifier used by [`export`](Self::export) and
    /// re-advertisement.
    pub fn with_simplifier(mut self, simplifier: Arc<dyn CurveSimplifier>) -> Self {
        self.simplifier = simplifier;
        self
    }

    pub fn connector_id(&self) -> &str {
        &self.connector_id
    }

    /// How long a peer route lives without being re-advertised.
    pub fn max_age(&self) -> Duration {
        self.max_age.to_std().unwrap_or_default()
    }

    pub fn simplifier(&self) -> &dyn CurveSimplifier {
        self.simplifier.as_ref()
    }

    /// Install ledger pairs this connector operates itself, then compose
    /// every stored route behind them. Nothing is installed if any
    /// advertisement is malformed.
    ///
    /// Returns the number of records inserted or changed.
    pub fn add_local_routes(
        &mut self,
        adverts: &[RouteAdvertisement],
        now: DateTime<Utc>,
    ) -> Result<usize, RoutingError> {
        let validated = adverts
            .iter()
            .map(|advert| advert.validate().map(|curve| (advert, curve)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut written = 0;
        for (advert, curve) in validated {
            let record = RouteRecord::configured(advert, curve, &self.connector_id, now);
            if let Some(account) = &advert.source_account {
                self.local_accounts
                    .insert(advert.source_ledger.clone(), account.clone());
            }
            if let Some(account) = &advert.destination_account {
                self.local_accounts
                    .insert(advert.destination_ledger.clone(), account.clone());
            }
            let pair = self
                .routes
                .entry(advert.source_ledger.clone())
                .or_default()
                .entry(advert.destination_ledger.clone())
                .or_default();
            // The pair replaces whatever we had composed for it ourselves.
            pair.retain(|key, _| key.connector != self.connector_id);
            pair.insert(record.key(), record);
            written += 1;
        }

        let seeds: Vec<RouteRecord> = self.all_routes().cloned().collect();
        let mut composer = RouteComposer::new(&mut self.routes, &self.connector_id, now);
        for tail in seeds {
            written += composer.extend(&self.connector_id, tail);
        }

        info!(
            connector = %self.connector_id,
            pairs = adverts.len(),
            routes = self.size(),
            "installed local routes"
        );
        Ok(written)
    }

    /// Apply a route advertised by a peer connector.
    ///
    /// Returns `Ok(true)` when the advertisement produced or changed at
    /// least one route, `Ok(false)` when it was ignored: it echoes our own
    /// routes, it competes with a pair we configured, or nothing of ours
    /// reaches its source ledger.
    pub fn add_route(
        &mut self,
        advert: &RouteAdvertisement,
        now: DateTime<Utc>,
    ) -> Result<bool, RoutingError> {
        let curve = advert.validate()?;

        if advert.connector == self.connector_id {
            debug!(
                source = %advert.source_ledger,
                destination = %advert.destination_ledger,
                "ignoring our own advertisement"
            );
            return Ok(false);
        }
        if self.has_local_route(&advert.source_ledger, &advert.destination_ledger) {
            debug!(
                source = %advert.source_ledger,
                destination = %advert.destination_ledger,
                connector = %advert.connector,
                "local route takes precedence over peer advertisement"
            );
            return Ok(false);
        }

        let expires_at = now.checked_add_signed(self.max_age).ok_or_else(|| {
            RoutingError::InvalidArgument(format!("route expiry overflows at {now}"))
        })?;
        let tail = RouteRecord::advertised(advert, curve, now, expires_at);

        let written = RouteComposer::new(&mut self.routes, &self.connector_id, now)
            .extend(&advert.connector, tail);

        debug!(
            source = %advert.source_ledger,
            destination = %advert.destination_ledger,
            connector = %advert.connector,
            written,
            "processed route advertisement"
        );
        Ok(written > 0)
    }

    /// Drop every route whose expiry is at or before `now`. Returns the
    /// number of routes removed.
    pub fn remove_expired_routes(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.size();
        for destinations in self.routes.values_mut() {
            for pair in destinations.values_mut() {
                pair.retain(|_, route| !route.is_expired(now));
            }
            destinations.retain(|_, pair| !pair.is_empty());
        }
        self.routes.retain(|_, destinations| !destinations.is_empty());

        let removed = before - self.size();
        if removed > 0 {
            info!(removed, remaining = before - removed, "removed expired routes");
        }
        removed
    }

    /// Every stored route with its curve simplified to at most `max_points`
    /// points, ordered by source, destination, then connector.
    pub fn export(&self, max_points: usize) -> Vec<ExportedRoute> {
        let mut exported: Vec<ExportedRoute> = self
            .pairs()
            .flat_map(|(source, destination, pair)| {
                pair.iter().map(move |(key, route)| ExportedRoute {
                    source_ledger: source.to_string(),
                    destination_ledger: destination.to_string(),
                    connector: key.connector.clone(),
                    min_message_window: route.min_message_window,
                    source_account: route.source_account.clone(),
                    points: route
                        .curve
                        .simplify_with(self.simplifier(), max_points)
                        .points()
                        .to_vec(),
                })
            })
            .collect();

        exported.sort_by(|a, b| {
            (&a.source_ledger, &a.destination_ledger, &a.connector).cmp(&(
                &b.source_ledger,
                &b.destination_ledger,
                &b.connector,
            ))
        });
        exported
    }

    /// The first route from `source` to `destination` through `connector`,
    /// in path order.
    pub fn get(&self, source: &str, destination: &str, connector: &str) -> Option<&RouteRecord> {
        self.routes_for(source, destination)
            .find(|(c, _)| *c == connector)
            .map(|(_, route)| route)
    }

    /// The route from `source` to `destination` through `connector` along
    /// exactly `path`.
    pub fn get_path(&self, connector: &str, path: &[&str]) -> Option<&RouteRecord> {
        let (source, destination) = (path.first()?, path.last()?);
        let key = RouteKey {
            connector: connector.to_string(),
            path: path.iter().map(|ledger| ledger.to_string()).collect(),
        };
        self.routes.get(*source)?.get(*destination)?.get(&key)
    }

    /// All routes from `source` to `destination` with their connector,
    /// ordered by connector then path.
    pub fn routes_for(
        &self,
        source: &str,
        destination: &str,
    ) -> impl Iterator<Item = (&str, &RouteRecord)> {
        self.routes
            .get(source)
            .and_then(|destinations| destinations.get(destination))
            .into_iter()
            .flat_map(|pair| pair.iter().map(|(key, r)| (key.connector.as_str(), r)))
    }

    /// The configured pair from `source` to `destination`, if we operate one.
    pub fn local_pair(&self, source: &str, destination: &str) -> Option<&RouteRecord> {
        self.routes_for(source, destination)
            .map(|(_, route)| route)
            .find(|route| route.is_local_pair())
    }

    fn has_local_route(&self, source: &str, destination: &str) -> bool {
        self.routes_for(source, destination)
            .any(|(_, route)| route.is_local)
    }

    /// Every (source, destination) pair with at least one route.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, &PairRoutes)> {
        self.routes.iter().flat_map(|(source, destinations)| {
            destinations
                .iter()
                .map(move |(destination, pair)| (source.as_str(), destination.as_str(), pair))
        })
    }

    pub fn all_routes(&self) -> impl Iterator<Item = &RouteRecord> {
        self.routes
            .values()
            .flat_map(|destinations| destinations.values())
            .flat_map(|pair| pair.values())
    }

    /// Source ledgers with at least one route, in order.
    pub fn source_ledgers(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Destination ledgers reachable from `source`, in order.
    pub fn destinations_from(&self, source: &str) -> impl Iterator<Item = &str> {
        self.routes
            .get(source)
            .into_iter()
            .flat_map(|destinations| destinations.keys().map(String::as_str))
    }

    /// Our account on `ledger`, as configured on a local pair.
    pub fn local_account(&self, ledger: &str) -> Option<&str> {
        self.local_accounts.get(ledger).map(String::as_str)
    }

    /// The source ledger whose prefix is the longest match for `address`.
    pub fn resolve_source_ledger(&self, address: &str) -> Option<&str> {
        longest_prefix(self.source_ledgers(), address)
    }

    /// The destination ledger reachable from `source` whose prefix is the
    /// longest match for `address`.
    pub fn resolve_destination_ledger(&self, source: &str, address: &str) -> Option<&str> {
        longest_prefix(self.destinations_from(source), address)
    }

    /// Total number of stored routes.
    pub fn size(&self) -> usize {
        self.all_routes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn longest_prefix<'a>(ledgers: impl Iterator<Item = &'a str>, address: &str) -> Option<&'a str> {
    ledgers
        .filter(|ledger| address.starts_with(*ledger))
        .max_by_key(|ledger| ledger.len())
}

impl fmt::Debug for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingTable")
            .field("connector_id", &self.connector_id)
            .field("max_age", &self.max_age)
            .field("routes", &self.routes)
            .field("local_accounts", &self.local_accounts)
            .finish_non_exhaustive()
    }
}
