//! Reusable test helpers for session and access integration tests.
//!
//! Provides `ScriptedProvider`, an in-memory identity provider whose
//! responses and latency are set per test, and builders for identities and
//! app state. `http_stub` serves canned platform API responses.
#![allow(dead_code)]

pub mod http_stub;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use amp_client::auth::{AuthError, Credentials, IdentityProvider, Registration};
use amp_client::config::ClientConfig;
use amp_client::AppState;
use amp_common::{AccountCategory, Identity};
use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

/// How `restore_session` behaves.
#[derive(Debug, Clone)]
pub enum Restore {
    Identity(Identity),
    Absent,
    Fail,
    /// Never resolves.
    Hang,
}

/// Identity provider driven entirely by test setup.
pub struct ScriptedProvider {
    pub restore: Mutex<Restore>,
    /// Returned by sign-in, sign-up and refresh.
    pub account: Mutex<Option<Identity>>,
    pub latency: Duration,
    pub fail_sign_out: bool,
    pub restore_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(restore: Restore) -> Self {
        Self {
            restore: Mutex::new(restore),
            account: Mutex::new(None),
            latency: Duration::ZERO,
            fail_sign_out: false,
            restore_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_account(mut self, identity: Identity) -> Self {
        self.account = Mutex::new(Some(identity));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn failing_sign_out(mut self) -> Self {
        self.fail_sign_out = true;
        self
    }

    pub fn restore_calls(&self) -> usize {
        self.restore_calls.load(Ordering::SeqCst)
    }

    async fn account(&self) -> Result<Identity, AuthError> {
        tokio::time::sleep(self.latency).await;
        self.account
            .lock()
            .await
            .clone()
            .ok_or(AuthError::InvalidCredentials)
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<Identity, AuthError> {
        self.account().await
    }

    async fn sign_up(&self, _registration: &Registration) -> Result<Identity, AuthError> {
        self.account()
            .await
            .map_err(|_| AuthError::UserAlreadyExists)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out {
            return Err(AuthError::UnexpectedStatus(503));
        }
        Ok(())
    }

    async fn restore_session(&self) -> Result<Option<Identity>, AuthError> {
        self.restore_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        let restore = self.restore.lock().await.clone();
        match restore {
            Restore::Identity(identity) => Ok(Some(identity)),
            Restore::Absent => Ok(None),
            Restore::Fail => Err(AuthError::UnexpectedStatus(500)),
            Restore::Hang => std::future::pending().await,
        }
    }

    async fn refresh_profile(&self) -> Result<Identity, AuthError> {
        self.account().await
    }
}

pub fn identity(category: AccountCategory) -> Identity {
    Identity::new(Uuid::new_v4(), format!("{category}-user"), category)
}

pub fn credentials() -> Credentials {
    Credentials {
        username: "nova".into(),
        password: "correct horse battery staple".into(),
    }
}

pub fn registration() -> Registration {
    Registration {
        username: "nova".into(),
        email: Some("nova@amp.example".into()),
        password: "correct horse battery staple".into(),
        display_name: Some("Nova".into()),
    }
}

/// App state around `provider` with a short restore timeout.
pub fn app_with(provider: Arc<ScriptedProvider>) -> AppState {
    AppState::new(ClientConfig::default_for_test(), provider)
}
