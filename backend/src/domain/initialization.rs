//! Persisted guard for one-time initialisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage key of the flag guarding the sub-category catalog.
pub const SUB_CATEGORIES_FLAG_KEY: &str = "subcategories";

/// A process-wide initialisation flag.
///
/// Absent or `initialized == false` before the first successful seed. Set to
/// `true` in the same atomic step as the reseed and never cleared by this
/// service; clearing it externally starts a new seed epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializationFlag {
    /// Whether the guarded resource has been initialised.
    pub initialized: bool,
    /// When the flag was last written.
    pub last_updated: DateTime<Utc>,
}

impl InitializationFlag {
    /// A flag marking the resource initialised at `at`.
    pub const fn initialized_at(at: DateTime<Utc>) -> Self {
        Self {
            initialized: true,
            last_updated: at,
        }
    }
}
