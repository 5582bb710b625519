//! Liqroute Core — rate-curve algebra for ledger connectors.
//!
//! This crate provides:
//! - [`Curve`] — an immutable piecewise-linear liquidity curve with
//!   interpolation, inversion, pointwise-max combination and composition.
//! - [`CurveSimplifier`] and [`VisvalingamWhyatt`] — bounded-size curve export.
//! - [`amount`] — the decimal-string amount codec used in quotes.
//! - [`TableConfig`] — routing table configuration.

pub mod amount;
pub mod config;
pub mod curve;
pub mod error;
pub mod simplify;

pub use amount::{format_amount, parse_amount};
pub use config::TableConfig;
pub use curve::{Curve, Point};
pub use error::CoreError;
pub use simplify::{CurveSimplifier, VisvalingamWhyatt};
