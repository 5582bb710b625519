/// Errors raised at the boundary of the curve algebra.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid curve: {0}")]
    InvalidCurve(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
