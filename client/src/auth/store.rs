//! Identity Store
//!
//! Holds the signed-in identity and the session-restore loading flag.
//! Changes are published through a `watch` channel so views re-run their
//! access checks on every update.

use std::time::Duration;

use amp_common::Identity;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::provider::IdentityProvider;

/// Point-in-time view of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    /// Session restore in progress.
    pub loading: bool,
}

impl SessionSnapshot {
    /// Snapshot with a signed-in identity.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            loading: false,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Raises `loading` for the duration of a restore.
///
/// Dropping it before [`LoadingFlag::settle`] (the restore future was
/// cancelled) lowers the flag again and leaves the identity untouched.
struct LoadingFlag<'a> {
    state: &'a watch::Sender<SessionSnapshot>,
    settled: bool,
}

impl<'a> LoadingFlag<'a> {
    fn raise(state: &'a watch::Sender<SessionSnapshot>) -> Self {
        state.send_modify(|snapshot| snapshot.loading = true);
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, identity: Option<Identity>) {
        self.settled = true;
        self.state.send_modify(|snapshot| {
            snapshot.loading = false;
            snapshot.identity = identity;
        });
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Session restore abandoned");
            self.state.send_modify(|snapshot| snapshot.loading = false);
        }
    }
}

/// Single source of truth for the signed-in identity.
///
/// Every write, restore included, is applied when it completes, so the write
/// that finishes last wins. [`SessionManager`](super::SessionManager) runs
/// restore and the other lifecycle operations one at a time.
pub struct IdentityStore {
    state: watch::Sender<SessionSnapshot>,
    /// Held for the whole restore; `true` once a restore has finished.
    init: Mutex<bool>,
    restore_timeout: Duration,
}

impl IdentityStore {
    /// Create an empty store.
    ///
    /// `restore_timeout` bounds [`IdentityStore::initialize`].
    #[must_use]
    pub fn new(restore_timeout: Duration) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            state,
            init: Mutex::new(false),
            restore_timeout,
        }
    }

    /// Restore the persisted session through `provider`.
    ///
    /// Only the first completed call performs a restore; concurrent callers
    /// wait for it and later callers return immediately. A provider error or
    /// timeout leaves the store signed out. If the call is cancelled the
    /// loading flag is lowered and a later call restores again.
    pub async fn initialize(&self, provider: &dyn IdentityProvider) {
        let mut initialized = self.init.lock().await;
        if *initialized {
            debug!("Session already initialized");
            return;
        }

        let loading = LoadingFlag::raise(&self.state);
        let restored = match tokio::time::timeout(self.restore_timeout, provider.restore_session())
            .await
        {
            Ok(Ok(identity)) => identity,
            Ok(Err(e)) => {
                warn!("Session restore failed: {}", e);
                None
            }
            Err(_) => {
                warn!(
                    "Session restore timed out after {:?}",
                    self.restore_timeout
                );
                None
            }
        };

        match &restored {
            Some(identity) => info!("Session restored for {}", identity.username),
            None => info!("No session to restore"),
        }
        loading.settle(restored);
        *initialized = true;
    }

    /// Replace the current identity.
    pub fn set_identity(&self, identity: Identity) {
        debug!(user_id = %identity.id, category = %identity.category, "Identity set");
        self.state
            .send_modify(|snapshot| snapshot.identity = Some(identity));
    }

    /// Replace the identity only if the store still holds `id`.
    ///
    /// Returns `false` and leaves the store untouched otherwise.
    pub fn replace_if_current(&self, id: Uuid, identity: Identity) -> bool {
        self.state.send_if_modified(|snapshot| {
            let holds_id = snapshot.identity.as_ref().map(|i| i.id) == Some(id);
            if holds_id {
                snapshot.identity = Some(identity);
            }
            holds_id
        })
    }

    /// Sign the identity out. No-op when already absent.
    pub fn clear(&self) {
        let cleared = self
            .state
            .send_if_modified(|snapshot| snapshot.identity.take().is_some());
        if cleared {
            debug!("Identity cleared");
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn current(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receive a notification whenever the snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> SnapshotReceiver {
        SnapshotReceiver {
            rx: self.state.subscribe(),
        }
    }
}

/// Change feed of session snapshots.
pub struct SnapshotReceiver {
    rx: watch::Receiver<SessionSnapshot>,
}

impl SnapshotReceiver {
    /// Wait for the next change and return the new snapshot.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<SessionSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Latest snapshot without waiting.
    #[must_use]
    pub fn latest(&self) -> SessionSnapshot {
        self.rx.borrow().clone()
    }
}
