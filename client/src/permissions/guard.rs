//! Access guard for gated views.
//!
//! Picks between protected content and a fallback. Rendering stays with the
//! caller; the guard only decides which branch runs.

use super::matrix::PermissionMatrix;
use super::queries::AccessControl;
use super::resolver::{evaluate, Constraints, Decision, DenyReason};
use crate::auth::SessionSnapshot;

/// Which branch a guarded view should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Show the protected content.
    Protected,
    /// Session still restoring.
    Loading,
    Denied(DenyReason),
    /// Allowed by category and capability, but the account is not verified.
    Unverified,
}

impl GuardOutcome {
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        matches!(self, Self::Protected)
    }
}

impl From<Decision> for GuardOutcome {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow => Self::Protected,
            Decision::Pending => Self::Loading,
            Decision::Deny(reason) => Self::Denied(reason),
        }
    }
}

/// Constraints for one gated view.
#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    constraints: Constraints,
    require_verified: bool,
}

impl AccessGuard {
    #[must_use]
    pub fn new(constraints: Constraints) -> Self {
        Self {
            constraints,
            require_verified: false,
        }
    }

    /// Also require the verified badge once everything else passes.
    #[must_use]
    pub fn require_verified(mut self) -> Self {
        self.require_verified = true;
        self
    }

    /// Outcome for the current session.
    #[must_use]
    pub fn check(&self, access: &AccessControl) -> GuardOutcome {
        let snapshot = access.snapshot();
        let decision = access.evaluate_snapshot(&snapshot, &self.constraints);
        self.outcome(&snapshot, decision)
    }

    /// Outcome for a given snapshot.
    #[must_use]
    pub fn decide(&self, snapshot: &SessionSnapshot, matrix: &PermissionMatrix) -> GuardOutcome {
        self.outcome(snapshot, evaluate(snapshot, &self.constraints, matrix))
    }

    // The verified check reads the snapshot that produced `decision`.
    fn outcome(&self, snapshot: &SessionSnapshot, decision: Decision) -> GuardOutcome {
        let verified = snapshot.identity.as_ref().is_some_and(|i| i.verified);
        match decision {
            Decision::Allow if self.require_verified && !verified => GuardOutcome::Unverified,
            decision => decision.into(),
        }
    }

    /// Run `protected` when access is granted, otherwise `fallback` with the
    /// outcome that blocked it. Exactly one closure runs.
    pub fn select<T>(
        &self,
        access: &AccessControl,
        protected: impl FnOnce() -> T,
        fallback: impl FnOnce(&GuardOutcome) -> T,
    ) -> T {
        match self.check(access) {
            GuardOutcome::Protected => protected(),
            outcome => fallback(&outcome),
        }
    }
}
