use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::route::RouteRecord;
use crate::table::RouteMap;

/// Extends the configured ledger pairs with routes that start where they end,
/// then keeps extending every composite that changed until nothing does.
///
/// Paths strictly lengthen on every step and never revisit a ledger, so the
/// worklist always drains.
pub(crate) struct RouteComposer<'a> {
    routes: &'a mut RouteMap,
    connector_id: &'a str,
    now: DateTime<Utc>,
}

impl<'a> RouteComposer<'a> {
    pub(crate) fn new(routes: &'a mut RouteMap, connector_id: &'a str, now: DateTime<Utc>) -> Self {
        Self {
            routes,
            connector_id,
            now,
        }
    }

    /// Compose `tail` behind every configured pair ending at its source
    /// ledger, storing the composites under `connector`. Returns the number
    /// of records inserted or changed.
    pub(crate) fn extend(&mut self, connector: &str, tail: RouteRecord) -> usize {
        let mut queue = VecDeque::from([(connector.to_string(), tail)]);
        let mut written = 0;

        while let Some((connector, tail)) = queue.pop_front() {
            for head in self.configured_pairs_into(tail.source_ledger()) {
                let Some(composite) = head.join(&tail, &connector, self.now) else {
                    continue;
                };
                if let Some(stored) = self.upsert(composite) {
                    written += 1;
                    // Anything built on top of a stored record starts with
                    // one of our own pairs, so it is ours to key.
                    queue.push_back((self.connector_id.to_string(), stored));
                }
            }
        }
        written
    }

    fn configured_pairs_into(&self, ledger: &str) -> Vec<RouteRecord> {
        self.routes
            .values()
            .filter_map(|destinations| destinations.get(ledger))
            .filter_map(|pair| pair.values().find(|route| route.is_local_pair()))
            .cloned()
            .collect()
    }

    /// Store `composite` under its connector and path, merging only with a
    /// record for that exact route. Returns the stored record when the
    /// table changed.
    fn upsert(&mut self, composite: RouteRecord) -> Option<RouteRecord> {
        let source = composite.source_ledger().to_string();
        let destination = composite.destination_ledger().to_string();
        let key = composite.key();

        let pair = self
            .routes
            .get(&source)
            .and_then(|destinations| destinations.get(&destination));

        if composite.connector == self.connector_id
            && pair.is_some_and(|routes| routes.values().any(RouteRecord::is_local_pair))
        {
            trace!(%source, %destination, "configured pair is never overridden");
            return None;
        }

        let stored = match pair.and_then(|routes| routes.get(&key)) {
            None => composite,
            Some(current) if current.is_local && !composite.is_local => {
                trace!(
                    %source,
                    %destination,
                    connector = %key.connector,
                    "local route outranks peer route"
                );
                return None;
            }
            Some(current) if !current.is_local && composite.is_local => composite,
            Some(current) => {
                let merged = current.merge(&composite);
                if !merged.differs_from(current) {
                    return None;
                }
                merged
            }
        };

        debug!(
            %source,
            %destination,
            connector = %key.connector,
            hops = stored.hop_count(),
            is_local = stored.is_local,
            "stored route"
        );
        self.routes
            .entry(source)
            .or_default()
            .entry(destination)
            .or_default()
            .insert(key, stored.clone());
        Some(stored)
    }
}
