use liqroute_core::CoreError;

/// Errors that can occur within the routing layer.
///
/// A missing route is not an error: lookups return `None` and rejected
/// advertisements return `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("invalid route advertisement: {reason}")]
    InvalidAdvertisement { reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
