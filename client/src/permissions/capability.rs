//! Account capabilities.
//!
//! Capabilities are organized by feature area:
//! - Media (bit 0): Uploading tracks, mixes and video
//! - Events (bits 1-2): Event creation and ticket sales
//! - Presence (bits 3-4): Professional page and audience analytics

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Capability set of an account category, one bit per [`Capability`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct CapabilitySet: u32 {
        // === Media (bit 0) ===
        /// Upload tracks, mixes and video
        const UPLOAD_MEDIA       = 1 << 0;

        // === Events (bits 1-2) ===
        /// Create and publish events
        const CREATE_EVENTS      = 1 << 1;
        /// Sell tickets for events
        const SELL_TICKETS       = 1 << 2;

        // === Presence (bits 3-4) ===
        /// Own a professional page
        const PROFESSIONAL_PAGE  = 1 << 3;
        /// View audience analytics
        const VIEW_ANALYTICS     = 1 << 4;
    }
}

impl CapabilitySet {
    /// Capabilities shared by every producer category.
    pub const PRODUCER_BASE: Self = Self::PROFESSIONAL_PAGE.union(Self::VIEW_ANALYTICS);

    /// Check if this set includes the specified capability bit(s).
    ///
    /// # Examples
    ///
    /// ```
    /// use amp_client::permissions::CapabilitySet;
    ///
    /// let set = CapabilitySet::UPLOAD_MEDIA | CapabilitySet::CREATE_EVENTS;
    /// assert!(set.has(CapabilitySet::UPLOAD_MEDIA));
    /// assert!(!set.has(CapabilitySet::SELL_TICKETS));
    /// ```
    #[must_use]
    pub const fn has(self, capability: Self) -> bool {
        self.contains(capability)
    }

    /// Expand the set into its individual capabilities.
    pub fn capabilities(self) -> impl Iterator<Item = Capability> {
        Capability::all()
            .iter()
            .copied()
            .filter(move |c| self.has(c.flag()))
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::empty()
    }
}

/// A single named capability.
///
/// Names follow the platform's wire convention (`canUploadMedia`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Capability {
    #[serde(rename = "canUploadMedia")]
    UploadMedia,
    #[serde(rename = "canCreateEvents")]
    CreateEvents,
    #[serde(rename = "canSellTickets")]
    SellTickets,
    #[serde(rename = "canHaveProfessionalPage")]
    ProfessionalPage,
    #[serde(rename = "canViewAnalytics")]
    ViewAnalytics,
}

impl Capability {
    /// Returns all capabilities as a slice.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UploadMedia,
            Self::CreateEvents,
            Self::SellTickets,
            Self::ProfessionalPage,
            Self::ViewAnalytics,
        ]
    }

    /// The bit this capability occupies in a [`CapabilitySet`].
    #[must_use]
    pub const fn flag(self) -> CapabilitySet {
        match self {
            Self::UploadMedia => CapabilitySet::UPLOAD_MEDIA,
            Self::CreateEvents => CapabilitySet::CREATE_EVENTS,
            Self::SellTickets => CapabilitySet::SELL_TICKETS,
            Self::ProfessionalPage => CapabilitySet::PROFESSIONAL_PAGE,
            Self::ViewAnalytics => CapabilitySet::VIEW_ANALYTICS,
        }
    }

    /// Wire name of the capability.
    ///
    /// # Examples
    ///
    /// ```
    /// use amp_client::permissions::Capability;
    ///
    /// assert_eq!(Capability::SellTickets.as_str(), "canSellTickets");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UploadMedia => "canUploadMedia",
            Self::CreateEvents => "canCreateEvents",
            Self::SellTickets => "canSellTickets",
            Self::ProfessionalPage => "canHaveProfessionalPage",
            Self::ViewAnalytics => "canViewAnalytics",
        }
    }

    /// Returns a human-readable description of the capability.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::UploadMedia => "Upload tracks, mixes and video",
            Self::CreateEvents => "Create and publish events",
            Self::SellTickets => "Sell tickets for events",
            Self::ProfessionalPage => "Own a professional page",
            Self::ViewAnalytics => "View audience analytics",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown capability: {0}")]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownCapability(s.to_string()))
    }
}
