//! Identity Provider
//!
//! Boundary to whatever authenticates users and persists their session.

use amp_common::Identity;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// Sign-in credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Account registration data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub display_name: Option<String>,
}

/// Authenticates users and persists sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate with existing credentials.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError>;

    /// Create an account and sign it in.
    async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthError>;

    /// End the session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Resume a persisted session, if any.
    async fn restore_session(&self) -> Result<Option<Identity>, AuthError>;

    /// Re-fetch the signed-in identity.
    async fn refresh_profile(&self) -> Result<Identity, AuthError>;
}
