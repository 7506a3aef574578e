//! Client-side access control.
//!
//! Decides which features to offer the signed-in identity:
//! - Capabilities: Per-category feature flags from a fixed matrix
//! - Decisions: Ordered evaluation of category and capability requirements
//!
//! These checks only shape what the client offers; the server enforces its
//! own rules.

pub mod capability;
pub mod guard;
pub mod matrix;
pub mod queries;
pub mod resolver;

pub use capability::{Capability, CapabilitySet, UnknownCapability};
pub use guard::{AccessGuard, GuardOutcome};
pub use matrix::{CapabilityRow, PermissionMatrix};
pub use queries::AccessControl;
pub use resolver::{evaluate, Constraints, Decision, DenyReason};
