//! Common Error Types

use thiserror::Error;

/// Errors raised while decoding shared types from their wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Account category name outside the closed set.
    #[error("Unknown account category: {0}")]
    UnknownCategory(String),

    /// Verification status name outside the closed set.
    #[error("Unknown verification status: {0}")]
    UnknownVerificationStatus(String),
}

/// Result alias for shared type conversions.
pub type Result<T> = std::result::Result<T, Error>;
