//! Per-user sub-category selections.
//!
//! A user may restrict random discovery within a category to an explicit
//! subset of that category's sub-categories. The `UserSubCategoryPreferences`
//! aggregate stores those subsets keyed by [`CategoryId`]. A category with no
//! entry means "no restriction"; empty lists are never stored.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, SubCategoryId, UserId};

/// Category to sub-category selection mapping.
pub type SubCategorySelections = BTreeMap<CategoryId, Vec<SubCategoryId>>;

/// A user's custom sub-category selections.
///
/// # Examples
///
/// ```
/// # use backend::domain::{CategoryId, SubCategoryId, UserId, UserSubCategoryPreferences};
/// let physics = SubCategoryId::random();
/// let prefs = UserSubCategoryPreferences::builder(UserId::random())
///     .select(CategoryId::Science, vec![physics])
///     .select(CategoryId::Art, vec![])
///     .build();
///
/// assert_eq!(prefs.selections_for(CategoryId::Science), &[physics]);
/// assert!(prefs.selections_for(CategoryId::Art).is_empty());
/// assert_eq!(prefs.selections.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct UserSubCategoryPreferences {
    /// The user these selections belong to.
    pub user_id: UserId,
    /// Non-empty selection lists keyed by category.
    pub selections: SubCategorySelections,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserSubCategoryPreferences {
    /// Create an unrestricted preferences record for the user.
    pub fn empty(user_id: UserId) -> Self {
        UserSubCategoryPreferencesBuilder::new(user_id).build()
    }

    /// Create a builder for constructing preferences incrementally.
    pub fn builder(user_id: UserId) -> UserSubCategoryPreferencesBuilder {
        UserSubCategoryPreferencesBuilder::new(user_id)
    }

    /// Return the selected ids for a category, or an empty slice when the
    /// category is unrestricted.
    pub fn selections_for(&self, category: CategoryId) -> &[SubCategoryId] {
        self.selections
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` when no category is restricted.
    pub fn is_unrestricted(&self) -> bool {
        self.selections.is_empty()
    }
}

/// Builder for constructing [`UserSubCategoryPreferences`] incrementally.
///
/// Empty lists are dropped and repeated ids are removed, keeping the first
/// occurrence.
#[derive(Debug, Clone)]
pub struct UserSubCategoryPreferencesBuilder {
    user_id: UserId,
    selections: SubCategorySelections,
    updated_at: Option<DateTime<Utc>>,
}

impl UserSubCategoryPreferencesBuilder {
    /// Create a new builder for the given user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            selections: BTreeMap::new(),
            updated_at: None,
        }
    }

    /// Replace the selection for one category. An empty list clears it.
    pub fn select(mut self, category: CategoryId, ids: Vec<SubCategoryId>) -> Self {
        let ids = dedup_preserving_order(ids);
        if ids.is_empty() {
            self.selections.remove(&category);
        } else {
            self.selections.insert(category, ids);
        }
        self
    }

    /// Replace every selection from a mapping.
    pub fn selections(mut self, selections: SubCategorySelections) -> Self {
        self.selections.clear();
        selections
            .into_iter()
            .fold(self, |builder, (category, ids)| builder.select(category, ids))
    }

    /// Set the updated timestamp.
    pub fn updated_at(mut self, ts: DateTime<Utc>) -> Self {
        self.updated_at = Some(ts);
        self
    }

    /// Build the final [`UserSubCategoryPreferences`] instance.
    pub fn build(self) -> UserSubCategoryPreferences {
        UserSubCategoryPreferences {
            user_id: self.user_id,
            selections: self.selections,
            updated_at: self.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

fn dedup_preserving_order(ids: Vec<SubCategoryId>) -> Vec<SubCategoryId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
