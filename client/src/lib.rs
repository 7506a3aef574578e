//! `Amp` Client Core
//!
//! Session state and access control shared by the Amp front ends.

pub mod auth;
pub mod config;
pub mod observability;
pub mod permissions;

use std::sync::Arc;

use anyhow::Result;

use auth::{
    HttpIdentityProvider, IdentityProvider, IdentityStore, KeyringTokenStore, SessionManager,
};
use config::ClientConfig;
use permissions::{AccessControl, PermissionMatrix};

/// Application state shared across views.
pub struct AppState {
    pub config: ClientConfig,
    /// Session lifecycle (sign-in, sign-out, refresh).
    pub session: SessionManager,
    /// Access checks against the current session.
    pub access: AccessControl,
}

impl AppState {
    /// Build state around an identity provider and the built-in matrix.
    pub fn new(config: ClientConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self::with_matrix(config, provider, PermissionMatrix::builtin().clone())
    }

    pub fn with_matrix(
        config: ClientConfig,
        provider: Arc<dyn IdentityProvider>,
        matrix: PermissionMatrix,
    ) -> Self {
        let store = Arc::new(IdentityStore::new(config.restore_timeout));
        let access = AccessControl::new(store.clone(), Arc::new(matrix));
        let session = SessionManager::new(provider, store);
        Self {
            config,
            session,
            access,
        }
    }

    /// Build state from the environment, talking to the platform API and
    /// keeping refresh tokens in the OS keyring.
    pub fn from_env() -> Result<Self> {
        let dotenv = dotenvy::dotenv();
        let config = ClientConfig::from_env()?;
        observability::init_tracing(config.log_format);
        match dotenv {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => tracing::debug!("No .env file, using process environment"),
            Err(e) => tracing::debug!("Ignoring unreadable .env file: {}", e),
        }

        let token_store = Arc::new(KeyringTokenStore::new(config.keyring_service.clone()));
        let provider =
            HttpIdentityProvider::new(&config.server_url, config.http_timeout, token_store)?;

        tracing::info!("Amp client configured for {}", config.server_url);
        Ok(Self::new(config, Arc::new(provider)))
    }

    /// Restore the persisted session. Call once at startup.
    pub async fn init(&self) {
        self.session.initialize().await;
    }

    #[must_use]
    pub fn store(&self) -> &Arc<IdentityStore> {
        self.session.store()
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::time::Duration;

    use serial_test::serial;

    use super::*;
    use crate::permissions::{Capability, Constraints, Decision, DenyReason};

    fn clear_env() {
        for key in [
            "AMP_SERVER_URL",
            "AMP_HTTP_TIMEOUT",
            "AMP_RESTORE_TIMEOUT",
            "AMP_KEYRING_SERVICE",
            "AMP_LOG_FORMAT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_builds_signed_out_state() {
        clear_env();
        env::set_var("AMP_SERVER_URL", "https://amp.example/");
        env::set_var("AMP_RESTORE_TIMEOUT", "2");
        let state = AppState::from_env();
        clear_env();

        let state = state.unwrap();
        assert_eq!(state.config.server_url, "https://amp.example");
        assert_eq!(state.config.restore_timeout, Duration::from_secs(2));
        assert!(state.store().current().identity.is_none());
        assert_eq!(
            state
                .access
                .evaluate(&Constraints::capability(Capability::UploadMedia)),
            Decision::Deny(DenyReason::NotAuthenticated)
        );
        assert_eq!(state.access.matrix(), PermissionMatrix::builtin());
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_config() {
        clear_env();
        env::set_var("AMP_HTTP_TIMEOUT", "forever");
        let result = AppState::from_env();
        clear_env();

        let err = result.err().expect("invalid timeout should fail");
        assert!(err.to_string().contains("AMP_HTTP_TIMEOUT"));
    }
}
