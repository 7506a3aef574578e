//! Authentication Error Types

use thiserror::Error;

/// Errors from identity provider and session operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (wrong username/password).
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// User already exists (registration).
    #[error("Username or email already exists")]
    UserAlreadyExists,

    /// Server rejected the submitted data.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Operation needs a signed-in identity.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Profile refresh returned a different account.
    #[error("Refreshed profile belongs to a different account")]
    IdentityMismatch,

    /// Profile payload could not be mapped to an identity.
    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] amp_common::Error),

    /// Server answered with an unexpected status.
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),

    /// HTTP transport or decoding error.
    #[error("Connection failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Secure storage error.
    #[error("Secure storage error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl AuthError {
    /// Whether the failure came from the network or storage rather than the
    /// user's input.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Keyring(_) | Self::UnexpectedStatus(500..=599)
        )
    }
}
