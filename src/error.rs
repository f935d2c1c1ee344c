//! Errors returned by table construction and draws.

use thiserror::Error;

/// Failures surfaced to the immediate caller of a draw or table operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    /// A draw asked for at least one winner from a table with no candidates.
    #[error("cannot draw from an empty weight table")]
    EmptyTable,

    /// A weight was negative or not finite, or would push the table total past `f64::MAX`.
    #[error("weight must be finite and >= 0 (got {weight})")]
    InvalidWeight { weight: f64 },
}

pub type Result<T, E = SamplerError> = std::result::Result<T, E>;
