//! Access decision logic.
//!
//! Combines a session snapshot, caller constraints and the permission matrix
//! into a [`Decision`].

use std::fmt;

use amp_common::AccountCategory;

use super::capability::Capability;
use super::matrix::PermissionMatrix;
use crate::auth::SessionSnapshot;

/// Requirements a feature places on the current identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    /// Allowed categories. Empty means any category.
    pub required_categories: Vec<AccountCategory>,
    /// Capability the identity's category must grant.
    pub required_capability: Option<Capability>,
}

impl Constraints {
    /// No requirement beyond being signed in.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn categories(categories: impl IntoIterator<Item = AccountCategory>) -> Self {
        Self::default().with_categories(categories)
    }

    #[must_use]
    pub fn capability(capability: Capability) -> Self {
        Self::default().with_capability(capability)
    }

    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = AccountCategory>) -> Self {
        self.required_categories = categories.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.required_capability = Some(capability);
        self
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Session restore still running; the caller should wait.
    Pending,
    Deny(DenyReason),
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    #[must_use]
    pub const fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Deny(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Why access was refused.
///
/// Carries enough structure for callers to build their own messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No identity is signed in.
    NotAuthenticated,

    /// Identity's category is not among the allowed ones.
    WrongCategory {
        required: Vec<AccountCategory>,
        actual: AccountCategory,
    },

    /// Identity's category lacks the capability.
    MissingCapability {
        capability: Capability,
        category: AccountCategory,
    },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "Sign in to continue"),
            Self::WrongCategory { required, actual } => {
                let required = required
                    .iter()
                    .map(AccountCategory::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Available to {required} accounts (your account: {actual})"
                )
            }
            Self::MissingCapability {
                capability,
                category,
            } => write!(
                f,
                "{category} accounts cannot use this feature (missing {capability})"
            ),
        }
    }
}

/// Evaluate constraints against a session snapshot.
///
/// Rules, first match wins:
/// 1. Restore in progress → `Pending`
/// 2. No identity → `NotAuthenticated`
/// 3. Category not among `required_categories` (when non-empty) → `WrongCategory`
/// 4. Matrix lacks `required_capability` → `MissingCapability`
/// 5. Otherwise `Allow`
///
/// Verification state is not consulted.
#[must_use]
pub fn evaluate(
    snapshot: &SessionSnapshot,
    constraints: &Constraints,
    matrix: &PermissionMatrix,
) -> Decision {
    if snapshot.loading {
        return Decision::Pending;
    }

    let Some(identity) = snapshot.identity.as_ref() else {
        return Decision::Deny(DenyReason::NotAuthenticated);
    };

    if !constraints.required_categories.is_empty()
        && !constraints.required_categories.contains(&identity.category)
    {
        return Decision::Deny(DenyReason::WrongCategory {
            required: constraints.required_categories.clone(),
            actual: identity.category,
        });
    }

    if let Some(capability) = constraints.required_capability {
        if !matrix.has(identity.category, capability) {
            return Decision::Deny(DenyReason::MissingCapability {
                capability,
                category: identity.category,
            });
        }
    }

    Decision::Allow
}
