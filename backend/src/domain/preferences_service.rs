//! Sub-category preference service.
//!
//! Reads and writes a user's per-category selections. Saving always replaces
//! the stored mapping so that clearing a category's selection is persisted.
//! Every saved id must belong to the current pool of its category.

use std::collections::HashSet;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::ports::{
    SubCategoryRepository, SubCategoryRepositoryError, UserSubCategoryPreferencesRepository,
    UserSubCategoryPreferencesRepositoryError,
};
use crate::domain::{
    CategoryId, SubCategoryId, SubCategorySelections, UserId, UserSubCategoryPreferences,
};

/// Errors raised while saving selections.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// A selected id is not part of the category's current pool.
    #[error("sub-category {id} is not part of the {category} pool")]
    UnknownSubCategory {
        /// Category the id was selected under.
        category: CategoryId,
        /// Offending identifier.
        id: SubCategoryId,
    },
    /// Reading the category pool failed.
    #[error(transparent)]
    Catalog(#[from] SubCategoryRepositoryError),
    /// Reading or writing the preference record failed.
    #[error(transparent)]
    Store(#[from] UserSubCategoryPreferencesRepositoryError),
}

/// Service managing users' sub-category selections.
#[derive(Clone)]
pub struct SubCategoryPreferencesService<P, S> {
    preferences_repo: Arc<P>,
    sub_categories: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<P, S> SubCategoryPreferencesService<P, S> {
    /// Create a new service over the preference store and the seeded catalog.
    pub fn new(preferences_repo: Arc<P>, sub_categories: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            preferences_repo,
            sub_categories,
            clock,
        }
    }
}

impl<P, S> SubCategoryPreferencesService<P, S>
where
    P: UserSubCategoryPreferencesRepository,
    S: SubCategoryRepository,
{
    /// Fetch the user's selections.
    ///
    /// A user with no stored record gets an unrestricted record; nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn selections_for(
        &self,
        user_id: &UserId,
    ) -> Result<UserSubCategoryPreferences, UserSubCategoryPreferencesRepositoryError> {
        let stored = self.preferences_repo.find_by_user_id(user_id).await?;
        Ok(stored.unwrap_or_else(|| {
            UserSubCategoryPreferences::builder(user_id.clone())
                .updated_at(self.clock.utc())
                .build()
        }))
    }

    /// Replace the user's full selection mapping.
    ///
    /// Empty lists are dropped and duplicate ids collapse to their first
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::UnknownSubCategory`] when an id is not in
    /// its category's pool; nothing is written in that case. Propagates
    /// repository failures.
    pub async fn save_selections(
        &self,
        user_id: &UserId,
        selections: SubCategorySelections,
    ) -> Result<UserSubCategoryPreferences, PreferencesError> {
        for (category, ids) in &selections {
            self.ensure_in_pool(*category, ids).await?;
        }
        let preferences = UserSubCategoryPreferences::builder(user_id.clone())
            .selections(selections)
            .updated_at(self.clock.utc())
            .build();
        self.preferences_repo.save(&preferences).await?;
        debug!(
            user_id = %user_id,
            categories = preferences.selections.len(),
            "saved sub-category selections"
        );
        Ok(preferences)
    }

    /// Replace the selection for a single category, keeping the others.
    ///
    /// An empty `ids` list removes the restriction for that category.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::UnknownSubCategory`] when an id is not in
    /// the category's pool. Propagates repository failures.
    pub async fn update_category_selection(
        &self,
        user_id: &UserId,
        category: CategoryId,
        ids: Vec<SubCategoryId>,
    ) -> Result<UserSubCategoryPreferences, PreferencesError> {
        self.ensure_in_pool(category, &ids).await?;
        let current = self.selections_for(user_id).await?;
        let preferences = UserSubCategoryPreferences::builder(user_id.clone())
            .selections(current.selections)
            .select(category, ids)
            .updated_at(self.clock.utc())
            .build();
        self.preferences_repo.save(&preferences).await?;
        debug!(
            user_id = %user_id,
            %category,
            selected = preferences.selections_for(category).len(),
            "updated sub-category selection"
        );
        Ok(preferences)
    }

    async fn ensure_in_pool(
        &self,
        category: CategoryId,
        ids: &[SubCategoryId],
    ) -> Result<(), PreferencesError> {
        if ids.is_empty() {
            return Ok(());
        }
        let pool = self.sub_categories.list_by_category(category).await?;
        let known: HashSet<SubCategoryId> = pool.iter().map(|record| record.id).collect();
        match ids.iter().find(|id| !known.contains(id)) {
            Some(id) => {
                warn!(%category, %id, "rejected selection outside the category pool");
                Err(PreferencesError::UnknownSubCategory { category, id: *id })
            }
            None => Ok(()),
        }
    }
}
