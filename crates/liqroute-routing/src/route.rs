use chrono::{DateTime, Utc};
use liqroute_core::Curve;
use serde::{Deserialize, Serialize};

use crate::advertisement::{PeerInfo, RouteAdvertisement};

/// Identity of a stored route within its (source, destination) pair.
///
/// Routes through the same connector that reach the destination along
/// different ledgers are distinct, so a quote always describes the path that
/// produces its amount.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteKey {
    pub connector: String,
    pub path: Vec<String>,
}

/// What this connector knows about reaching one ledger from another through
/// one next-hop connector along one ledger path.
///
/// The ledger path always starts at a ledger pair this connector operates
/// and holds at least two ledgers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Best known output for each input amount along the path.
    pub curve: Curve,
    /// Ledgers visited, source first and destination last.
    pub(crate) path: Vec<String>,
    /// Connector that takes over on the next ledger.
    pub connector: String,
    /// Sum of the message windows of every hop, in seconds.
    pub min_message_window: u32,
    /// Our account on the source ledger.
    pub source_account: Option<String>,
    /// Account on the destination ledger, as declared by the last hop.
    pub destination_account: Option<String>,
    /// Account on the next ledger to credit when this hop is not final.
    pub credit_account: Option<String>,
    pub peer_info: Option<PeerInfo>,
    pub created_at: DateTime<Utc>,
    /// `None` for routes derived purely from configuration.
    pub expires_at: Option<DateTime<Utc>>,
    /// True when every hop on the path is operated by this connector.
    pub is_local: bool,
}

impl RouteRecord {
    /// A ledger pair this connector operates itself.
    pub(crate) fn configured(
        advert: &RouteAdvertisement,
        curve: Curve,
        connector_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            curve,
            path: vec![advert.source_ledger.clone(), advert.destination_ledger.clone()],
            connector: connector_id.to_string(),
            min_message_window: advert.min_message_window,
            source_account: advert.source_account.clone(),
            destination_account: advert.destination_account.clone(),
            credit_account: None,
            peer_info: advert.peer_info.clone(),
            created_at: now,
            expires_at: None,
            is_local: true,
        }
    }

    /// A hop announced by a peer connector.
    pub(crate) fn advertised(
        advert: &RouteAdvertisement,
        curve: Curve,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            curve,
            path: vec![advert.source_ledger.clone(), advert.destination_ledger.clone()],
            connector: advert.connector.clone(),
            min_message_window: advert.min_message_window,
            source_account: advert.source_account.clone(),
            destination_account: advert.destination_account.clone(),
            credit_account: None,
            peer_info: advert.peer_info.clone(),
            created_at: now,
            expires_at: Some(expires_at),
            is_local: false,
        }
    }

    pub fn key(&self) -> RouteKey {
        RouteKey {
            connector: self.connector.clone(),
            path: self.path.clone(),
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn source_ledger(&self) -> &str {
        self.path.first().map_or("", String::as_str)
    }

    pub fn destination_ledger(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// The ledger the first hop delivers into.
    pub fn next_ledger(&self) -> &str {
        self.path.get(1).map_or("", String::as_str)
    }

    /// Number of ledger-to-ledger hops on the path.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// A single-hop route this connector operates itself.
    pub fn is_local_pair(&self) -> bool {
        self.is_local && self.path.len() == 2
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Compose `self` with a route starting where `self` ends. The result
    /// is keyed by `connector`. Returns `None` when the routes are not
    /// adjacent or the combined path would revisit a ledger.
    pub(crate) fn join(
        &self,
        tail: &RouteRecord,
        connector: &str,
        now: DateTime<Utc>,
    ) -> Option<RouteRecord> {
        if self.destination_ledger() != tail.source_ledger() {
            return None;
        }
        let onward = tail.path.get(1..)?;
        if onward.iter().any(|ledger| self.path.contains(ledger)) {
            return None;
        }

        let mut path = self.path.clone();
        path.extend(onward.iter().cloned());

        let expires_at = match (self.expires_at, tail.expires_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        Some(RouteRecord {
            curve: self.curve.join(&tail.curve),
            path,
            connector: connector.to_string(),
            min_message_window: self
                .min_message_window
                .saturating_add(tail.min_message_window),
            source_account: self.source_account.clone(),
            destination_account: tail.destination_account.clone(),
            credit_account: tail.source_account.clone(),
            peer_info: tail.peer_info.clone(),
            created_at: now,
            expires_at,
            is_local: self.is_local && tail.is_local,
        })
    }

    /// Merge a re-advertisement of the same route (same connector and path):
    /// best-of curve, widest message window, latest expiry, freshest
    /// metadata.
    pub(crate) fn merge(&self, incoming: &RouteRecord) -> RouteRecord {
        let expires_at = match (self.expires_at, incoming.expires_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            _ => None,
        };
        RouteRecord {
            curve: self.curve.combine(&incoming.curve),
            path: self.path.clone(),
            connector: self.connector.clone(),
            min_message_window: self.min_message_window.max(incoming.min_message_window),
            source_account: incoming
                .source_account
                .clone()
                .or_else(|| self.source_account.clone()),
            destination_account: incoming
                .destination_account
                .clone()
                .or_else(|| self.destination_account.clone()),
            credit_account: incoming
                .credit_account
                .clone()
                .or_else(|| self.credit_account.clone()),
            peer_info: incoming.peer_info.clone().or_else(|| self.peer_info.clone()),
            created_at: self.created_at,
            expires_at,
            is_local: self.is_local && incoming.is_local,
        }
    }

    /// True when replacing `previous` with `self` changes anything a quote
    /// or the expiry sweep would observe.
    pub(crate) fn differs_from(&self, previous: &RouteRecord) -> bool {
        self.curve.improves_on(&previous.curve)
            || self.min_message_window != previous.min_message_window
            || self.expires_at != previous.expires_at
            || self.credit_account != previous.credit_account
            || self.destination_account != previous.destination_account
            || self.peer_info != previous.peer_info
    }
}
