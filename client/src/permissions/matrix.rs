//! Category permission matrix.
//!
//! Maps every [`AccountCategory`] to the capabilities and quotas it grants.
//! The table is total over the closed category set; lookups by wire name
//! resolve anything unrecognized to "no capability".

use amp_common::AccountCategory;

use super::capability::{Capability, CapabilitySet};

/// Capabilities and quotas granted to one account category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityRow {
    pub capabilities: CapabilitySet,
    /// Uploads allowed per day.
    pub max_daily_uploads: u32,
}

impl CapabilityRow {
    #[must_use]
    pub const fn new(capabilities: CapabilitySet, max_daily_uploads: u32) -> Self {
        Self {
            capabilities,
            max_daily_uploads,
        }
    }

    /// Row granting nothing.
    pub const EMPTY: Self = Self::new(CapabilitySet::empty(), 0);

    #[must_use]
    pub const fn has(&self, capability: Capability) -> bool {
        self.capabilities.has(capability.flag())
    }
}

/// Built-in row for a category.
///
/// Exhaustive over [`AccountCategory`]; adding a category fails to compile
/// until it is given a row here.
const fn builtin_row(category: AccountCategory) -> CapabilityRow {
    match category {
        AccountCategory::Fan => CapabilityRow::EMPTY,
        AccountCategory::Artist => CapabilityRow::new(
            CapabilitySet::PRODUCER_BASE
                .union(CapabilitySet::UPLOAD_MEDIA)
                .union(CapabilitySet::CREATE_EVENTS)
                .union(CapabilitySet::SELL_TICKETS),
            20,
        ),
        AccountCategory::Dj => CapabilityRow::new(
            CapabilitySet::PRODUCER_BASE
                .union(CapabilitySet::UPLOAD_MEDIA)
                .union(CapabilitySet::CREATE_EVENTS),
            20,
        ),
        AccountCategory::Venue => CapabilityRow::new(
            CapabilitySet::PRODUCER_BASE
                .union(CapabilitySet::UPLOAD_MEDIA)
                .union(CapabilitySet::CREATE_EVENTS)
                .union(CapabilitySet::SELL_TICKETS),
            10,
        ),
        AccountCategory::Promoter => CapabilityRow::new(
            CapabilitySet::PRODUCER_BASE
                .union(CapabilitySet::CREATE_EVENTS)
                .union(CapabilitySet::SELL_TICKETS),
            0,
        ),
        AccountCategory::Label => CapabilityRow::new(
            CapabilitySet::PRODUCER_BASE.union(CapabilitySet::UPLOAD_MEDIA),
            50,
        ),
    }
}

const fn category_index(category: AccountCategory) -> usize {
    match category {
        AccountCategory::Fan => 0,
        AccountCategory::Artist => 1,
        AccountCategory::Dj => 2,
        AccountCategory::Venue => 3,
        AccountCategory::Promoter => 4,
        AccountCategory::Label => 5,
    }
}

const CATEGORY_COUNT: usize = 6;

static BUILTIN: PermissionMatrix = PermissionMatrix {
    rows: [
        builtin_row(AccountCategory::Fan),
        builtin_row(AccountCategory::Artist),
        builtin_row(AccountCategory::Dj),
        builtin_row(AccountCategory::Venue),
        builtin_row(AccountCategory::Promoter),
        builtin_row(AccountCategory::Label),
    ],
};

/// Immutable category → capability table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMatrix {
    rows: [CapabilityRow; CATEGORY_COUNT],
}

impl PermissionMatrix {
    /// The platform's standard matrix.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Build a matrix from a row function called once per category.
    pub fn from_fn(mut row: impl FnMut(AccountCategory) -> CapabilityRow) -> Self {
        let mut rows = [CapabilityRow::EMPTY; CATEGORY_COUNT];
        for category in AccountCategory::all() {
            rows[category_index(*category)] = row(*category);
        }
        Self { rows }
    }

    /// Row for a category.
    #[must_use]
    pub const fn capabilities_of(&self, category: AccountCategory) -> &CapabilityRow {
        &self.rows[category_index(category)]
    }

    /// Whether `category` grants `capability`.
    #[must_use]
    pub const fn has(&self, category: AccountCategory, capability: Capability) -> bool {
        self.capabilities_of(category).has(capability)
    }

    /// Lookup by wire names.
    ///
    /// Unknown category or capability names resolve to `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use amp_client::permissions::PermissionMatrix;
    ///
    /// let matrix = PermissionMatrix::builtin();
    /// assert!(matrix.has_capability("artist", "canUploadMedia"));
    /// assert!(!matrix.has_capability("fan", "canUploadMedia"));
    /// assert!(!matrix.has_capability("superstar", "canUploadMedia"));
    /// assert!(!matrix.has_capability("artist", "canFly"));
    /// ```
    #[must_use]
    pub fn has_capability(&self, category: &str, capability: &str) -> bool {
        let (Ok(category), Ok(capability)) = (
            category.parse::<AccountCategory>(),
            capability.parse::<Capability>(),
        ) else {
            return false;
        };
        self.has(category, capability)
    }

    /// Daily upload quota for a category.
    #[must_use]
    pub const fn max_daily_uploads(&self, category: AccountCategory) -> u32 {
        self.capabilities_of(category).max_daily_uploads
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        BUILTIN.clone()
    }
}
