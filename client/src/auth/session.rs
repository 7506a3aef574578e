//! Session lifecycle.
//!
//! Routes sign-in, sign-up, sign-out and profile refresh through the
//! identity provider and records the outcome in the [`IdentityStore`].

use std::sync::Arc;

use amp_common::Identity;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::error::AuthError;
use super::provider::{Credentials, IdentityProvider, Registration};
use super::store::IdentityStore;

/// Drives provider events into the identity store.
///
/// Lifecycle operations, session restore included, are serialized, so their
/// store writes land in the order the operations complete.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<IdentityStore>,
    lifecycle: Mutex<()>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<IdentityStore>) -> Self {
        Self {
            provider,
            store,
            lifecycle: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<IdentityStore> {
        &self.store
    }

    /// Restore the persisted session. See [`IdentityStore::initialize`].
    ///
    /// Runs under the lifecycle lock, so a sign-in or sign-out issued during
    /// startup completes after the restore and overrides it.
    pub async fn initialize(&self) {
        let _guard = self.lifecycle.lock().await;
        self.store.initialize(self.provider.as_ref()).await;
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let _guard = self.lifecycle.lock().await;
        let identity = self.provider.sign_in(credentials).await?;
        self.store.set_identity(identity.clone());
        info!("User {} signed in", identity.username);
        Ok(identity)
    }

    pub async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthError> {
        let _guard = self.lifecycle.lock().await;
        let identity = self.provider.sign_up(registration).await?;
        self.store.set_identity(identity.clone());
        info!("User {} registered", identity.username);
        Ok(identity)
    }

    /// Sign out. The store is cleared even if the provider fails.
    pub async fn sign_out(&self) {
        let _guard = self.lifecycle.lock().await;
        if let Err(e) = self.provider.sign_out().await {
            warn!("Provider sign-out failed, clearing local session anyway: {}", e);
        }
        self.store.clear();
        info!("Signed out");
    }

    /// Re-fetch the signed-in identity and update it in place.
    ///
    /// Fails with [`AuthError::NotAuthenticated`] when nobody is signed in and
    /// [`AuthError::IdentityMismatch`] when the provider returns a different
    /// account.
    pub async fn refresh_profile(&self) -> Result<Identity, AuthError> {
        let _guard = self.lifecycle.lock().await;
        let current_id = self
            .store
            .current()
            .identity
            .map(|i| i.id)
            .ok_or(AuthError::NotAuthenticated)?;

        let refreshed = self.provider.refresh_profile().await?;
        if refreshed.id != current_id {
            warn!(
                expected = %current_id,
                received = %refreshed.id,
                "Profile refresh returned a different account"
            );
            return Err(AuthError::IdentityMismatch);
        }

        if !self.store.replace_if_current(current_id, refreshed.clone()) {
            return Err(AuthError::NotAuthenticated);
        }
        Ok(refreshed)
    }
}
