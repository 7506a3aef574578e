//! Identity Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Account category.
///
/// The set is closed: every category has exactly one row in the client's
/// permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    /// Listener account with no producer features.
    #[default]
    Fan,
    /// Performing artist or band.
    Artist,
    /// DJ.
    Dj,
    /// Venue operator.
    Venue,
    /// Event promoter.
    Promoter,
    /// Record label.
    Label,
}

impl AccountCategory {
    /// Returns all categories as a slice.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Fan,
            Self::Artist,
            Self::Dj,
            Self::Venue,
            Self::Promoter,
            Self::Label,
        ]
    }

    /// Wire name of the category.
    ///
    /// # Examples
    ///
    /// ```
    /// use amp_common::AccountCategory;
    ///
    /// assert_eq!(AccountCategory::Dj.as_str(), "dj");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fan => "fan",
            Self::Artist => "artist",
            Self::Dj => "dj",
            Self::Venue => "venue",
            Self::Promoter => "promoter",
            Self::Label => "label",
        }
    }

    /// Whether this is the baseline unprivileged category.
    #[must_use]
    pub const fn is_baseline(&self) -> bool {
        matches!(self, Self::Fan)
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Review state of an account's verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Reviewed and approved.
    Approved,
    /// Reviewed and rejected.
    Rejected,
}

impl VerificationStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(Error::UnknownVerificationStatus(other.to_string())),
        }
    }
}

/// Authenticated user as seen by client-side access checks.
///
/// `verified` and `verification_status` are independent fields. The platform
/// does not keep them in sync, so neither is derived from the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User ID.
    pub id: Uuid,
    /// Username (unique).
    pub username: String,
    /// Display name.
    pub display_name: String,
    /// Account category.
    pub category: AccountCategory,
    /// Legacy verified badge.
    pub verified: bool,
    /// Verification review state.
    pub verification_status: VerificationStatus,
}

impl Identity {
    /// Create an unverified identity with a pending review.
    #[must_use]
    pub fn new(id: Uuid, username: impl Into<String>, category: AccountCategory) -> Self {
        let username = username.into();
        Self {
            id,
            display_name: username.clone(),
            username,
            category,
            verified: false,
            verification_status: VerificationStatus::Pending,
        }
    }

    /// Set the verified badge.
    #[must_use]
    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    /// Set the verification review state.
    #[must_use]
    pub fn with_verification_status(mut self, status: VerificationStatus) -> Self {
        self.verification_status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_roundtrip_through_from_str() {
        for category in AccountCategory::all() {
            assert_eq!(category.as_str().parse::<AccountCategory>(), Ok(*category));
        }
    }

    #[test]
    fn test_unknown_category_is_error() {
        let err = "superstar".parse::<AccountCategory>().unwrap_err();
        assert_eq!(err, Error::UnknownCategory("superstar".to_string()));
        assert!(err.to_string().contains("superstar"));
    }

    #[test]
    fn test_category_parse_is_case_sensitive() {
        assert!("Artist".parse::<AccountCategory>().is_err());
    }

    #[test]
    fn test_default_category_is_fan() {
        assert_eq!(AccountCategory::default(), AccountCategory::Fan);
        assert!(AccountCategory::Fan.is_baseline());
        assert!(!AccountCategory::Label.is_baseline());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&AccountCategory::Promoter).unwrap();
        assert_eq!(json, "\"promoter\"");

        let status: VerificationStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, VerificationStatus::Approved);
    }

    #[test]
    fn test_unknown_verification_status_is_error() {
        assert!(matches!(
            "maybe".parse::<VerificationStatus>(),
            Err(Error::UnknownVerificationStatus(_))
        ));
    }

    #[test]
    fn test_verified_flag_and_status_are_independent() {
        let identity = Identity::new(Uuid::new_v4(), "nova", AccountCategory::Artist)
            .with_verified(true)
            .with_verification_status(VerificationStatus::Rejected);

        assert!(identity.verified);
        assert_eq!(identity.verification_status, VerificationStatus::Rejected);
    }

    #[test]
    fn test_new_identity_defaults() {
        let identity = Identity::new(Uuid::new_v4(), "kai", AccountCategory::Fan);
        assert_eq!(identity.display_name, "kai");
        assert!(!identity.verified);
        assert_eq!(identity.verification_status, VerificationStatus::Pending);
    }
}
