//! Liqroute Routing — routing tables and quoting for ledger connectors.
//!
//! This crate provides:
//! - [`RoutingTable`] — the ledger pairs a connector operates, composed with
//!   peer advertisements into multi-hop routes keyed by next-hop connector
//!   and ledger path.
//! - [`RouteRecord`] — a stored route: curve, ledger path, accumulated
//!   message window, accounts, and expiry.
//! - [`RouteAdvertisement`] and [`create_readvertisement`] — the wire shape of
//!   routes received from and re-broadcast to peers.
//! - [`BestHop`] selection and [`Quote`] assembly by source or destination
//!   amount.

pub mod advertisement;
mod composer;
pub mod error;
pub mod quote;
pub mod route;
pub mod selector;
pub mod table;

// Re-exports for convenience.
pub use advertisement::{create_readvertisement, ExportedRoute, PeerInfo, RouteAdvertisement};
pub use error::RoutingError;
pub use quote::Quote;
pub use route::{RouteKey, RouteRecord};
pub use selector::BestHop;
pub use table::{PairRoutes, RoutingTable};
