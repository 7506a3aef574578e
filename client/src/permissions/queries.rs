//! Access queries for feature code.
//!
//! Every call reads a fresh snapshot from the identity store; nothing is
//! cached between calls.

use std::sync::Arc;

use amp_common::{AccountCategory, VerificationStatus};
use tracing::debug;

use super::capability::Capability;
use super::matrix::PermissionMatrix;
use super::resolver::{evaluate, Constraints, Decision};
use crate::auth::{IdentityStore, SessionSnapshot};

/// Read-only access surface over the identity store and permission matrix.
#[derive(Clone)]
pub struct AccessControl {
    store: Arc<IdentityStore>,
    matrix: Arc<PermissionMatrix>,
}

impl AccessControl {
    pub fn new(store: Arc<IdentityStore>, matrix: Arc<PermissionMatrix>) -> Self {
        Self { store, matrix }
    }

    #[must_use]
    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.current()
    }

    /// Evaluate constraints against the current session.
    #[must_use]
    pub fn evaluate(&self, constraints: &Constraints) -> Decision {
        self.evaluate_snapshot(&self.snapshot(), constraints)
    }

    /// Evaluate constraints against a snapshot the caller already holds.
    #[must_use]
    pub fn evaluate_snapshot(
        &self,
        snapshot: &SessionSnapshot,
        constraints: &Constraints,
    ) -> Decision {
        let decision = evaluate(snapshot, constraints, &self.matrix);
        if let Decision::Deny(reason) = &decision {
            debug!(?constraints, %reason, "Access denied");
        }
        decision
    }

    /// Whether the signed-in identity's category grants `capability`.
    ///
    /// `false` while signed out or while the session is still restoring.
    #[must_use]
    pub fn has_permission(&self, capability: Capability) -> bool {
        self.evaluate(&Constraints::capability(capability))
            .is_allowed()
    }

    /// [`AccessControl::has_permission`] by wire name; unknown names are `false`.
    #[must_use]
    pub fn has_permission_named(&self, capability: &str) -> bool {
        capability
            .parse::<Capability>()
            .is_ok_and(|c| self.has_permission(c))
    }

    #[must_use]
    pub fn is_category(&self, category: AccountCategory) -> bool {
        self.is_any_category(&[category])
    }

    #[must_use]
    pub fn is_any_category(&self, categories: &[AccountCategory]) -> bool {
        self.snapshot()
            .identity
            .is_some_and(|i| categories.contains(&i.category))
    }

    /// The identity's verified badge; `false` when signed out.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.snapshot().identity.is_some_and(|i| i.verified)
    }

    /// Verification review state, independent of [`AccessControl::is_verified`].
    #[must_use]
    pub fn verification_status(&self) -> Option<VerificationStatus> {
        self.snapshot().identity.map(|i| i.verification_status)
    }

    /// Category of the signed-in identity, or the baseline category when
    /// signed out.
    #[must_use]
    pub fn current_category(&self) -> AccountCategory {
        self.snapshot()
            .identity
            .map(|i| i.category)
            .unwrap_or_default()
    }

    /// Daily upload quota of the signed-in identity; 0 when signed out.
    #[must_use]
    pub fn upload_quota(&self) -> u32 {
        self.snapshot()
            .identity
            .map_or(0, |i| self.matrix.max_daily_uploads(i.category))
    }
}
