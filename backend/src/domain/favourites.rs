//! Favourite categories per user.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{FavouriteCategoriesRepository, FavouriteCategoriesRepositoryError};
use crate::domain::{CategoryId, UserId};

/// The categories a user marked as favourites, in the order chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteCategories {
    /// Owning user.
    pub user_id: UserId,
    /// Favourite categories without duplicates.
    pub categories: Vec<CategoryId>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl FavouriteCategories {
    /// Build a record, dropping repeated categories after their first use.
    pub fn new(
        user_id: UserId,
        categories: impl IntoIterator<Item = CategoryId>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut unique = Vec::new();
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        Self {
            user_id,
            categories: unique,
            updated_at,
        }
    }
}

/// Service reading and replacing favourite categories.
#[derive(Clone)]
pub struct FavouriteCategoriesService<F> {
    favourites_repo: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<F> FavouriteCategoriesService<F> {
    /// Create a new service with the given repository and clock.
    pub fn new(favourites_repo: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            favourites_repo,
            clock,
        }
    }
}

impl<F> FavouriteCategoriesService<F>
where
    F: FavouriteCategoriesRepository,
{
    /// Return the user's favourite categories; empty when none were saved.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn favourites_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CategoryId>, FavouriteCategoriesRepositoryError> {
        Ok(self
            .favourites_repo
            .find_by_user_id(user_id)
            .await?
            .map(|favourites| favourites.categories)
            .unwrap_or_default())
    }

    /// Replace the user's favourite categories.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn save_favourites(
        &self,
        user_id: &UserId,
        categories: Vec<CategoryId>,
    ) -> Result<FavouriteCategories, FavouriteCategoriesRepositoryError> {
        let favourites = FavouriteCategories::new(user_id.clone(), categories, self.clock.utc());
        self.favourites_repo.save(&favourites).await?;
        debug!(
            user_id = %user_id,
            count = favourites.categories.len(),
            "saved favourite categories"
        );
        Ok(favourites)
    }
}
