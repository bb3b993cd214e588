//! Seeded sub-category records.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CategoryId;

/// Collection-wide unique identifier of a seeded sub-category.
///
/// Identifiers are regenerated on every reseed, so a stored identifier may
/// refer to a record from an earlier seed epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubCategoryId(Uuid);

impl SubCategoryId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SubCategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SubCategoryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A sub-category belonging to exactly one category.
///
/// ## Invariants
/// - `name` and `description` are non-blank (enforced by the catalog loader).
/// - Records are only created by a full reseed and never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    /// Unique identifier.
    pub id: SubCategoryId,
    /// Display name; forwarded to content generation.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Owning category.
    pub parent_category: CategoryId,
}

impl SubCategory {
    /// Build a record with a freshly generated identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// # use backend::domain::{CategoryId, SubCategory};
    /// let physics = SubCategory::new(CategoryId::Science, "Fizik", "Madde ve enerji");
    ///
    /// assert_eq!(physics.parent_category, CategoryId::Science);
    /// assert_eq!(physics.name, "Fizik");
    /// ```
    pub fn new(
        parent_category: CategoryId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: SubCategoryId::random(),
            name: name.into(),
            description: description.into(),
            parent_category,
        }
    }

    /// Order records within a pool: by name bytes, then by id.
    ///
    /// Every adapter returns pools in this order so a draw with the same
    /// random value picks the same record regardless of the backing store.
    pub fn pool_order(&self, other: &Self) -> Ordering {
        self.name
            .as_bytes()
            .cmp(other.name.as_bytes())
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Order records across categories: by category key, then pool order.
    pub fn catalog_order(&self, other: &Self) -> Ordering {
        self.parent_category
            .as_str()
            .cmp(other.parent_category.as_str())
            .then_with(|| self.pool_order(other))
    }
}
