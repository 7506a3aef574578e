//! Refresh token persistence.
//!
//! Tokens are keyed by server URL so several servers can keep independent
//! sessions.

use dashmap::DashMap;
use tracing::debug;

use super::error::AuthError;

/// Persistent storage for refresh tokens.
pub trait TokenStore: Send + Sync {
    fn load(&self, server_url: &str) -> Result<Option<String>, AuthError>;
    fn save(&self, server_url: &str, token: &str) -> Result<(), AuthError>;
    /// Remove the token. Succeeds when none is stored.
    fn clear(&self, server_url: &str) -> Result<(), AuthError>;
}

fn keyring_user(server_url: &str) -> String {
    format!("refresh_token:{server_url}")
}

/// Token store backed by the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
}

impl KeyringTokenStore {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, server_url: &str) -> Result<keyring::Entry, AuthError> {
        Ok(keyring::Entry::new(&self.service, &keyring_user(server_url))?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self, server_url: &str) -> Result<Option<String>, AuthError> {
        match self.entry(server_url)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, server_url: &str, token: &str) -> Result<(), AuthError> {
        self.entry(server_url)?.set_password(token)?;
        debug!("Stored refresh token for {}", server_url);
        Ok(())
    }

    fn clear(&self, server_url: &str) -> Result<(), AuthError> {
        match self.entry(server_url)?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process token store, for tests and sessions that must not outlive the
/// process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, String>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, server_url: &str) -> Result<Option<String>, AuthError> {
        Ok(self
            .tokens
            .get(&keyring_user(server_url))
            .map(|t| t.value().clone()))
    }

    fn save(&self, server_url: &str, token: &str) -> Result<(), AuthError> {
        self.tokens
            .insert(keyring_user(server_url), token.to_string());
        Ok(())
    }

    fn clear(&self, server_url: &str) -> Result<(), AuthError> {
        self.tokens.remove(&keyring_user(server_url));
        Ok(())
    }
}
