//! Sub-category selection.
//!
//! For a category and a user's stored selections, the effective pool is the
//! category's full pool filtered to the user's chosen ids, or the full pool
//! when the user has made no choice for that category. One record is then
//! drawn uniformly at random.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::ports::{RandomSource, SubCategoryRepository, SubCategoryRepositoryError};
use crate::domain::{CategoryId, SubCategory, SubCategoryId, UserSubCategoryPreferences};

/// Errors raised while resolving a sub-category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The effective pool was empty: the category is unseeded or every
    /// selected id is stale.
    #[error("no sub-category candidates available for category '{category}'")]
    NoCandidates {
        /// Category that produced the empty pool.
        category: CategoryId,
    },
    /// The sub-category store failed.
    #[error("sub-category lookup failed: {0}")]
    Repository(#[from] SubCategoryRepositoryError),
}

/// Filter `pool` down to the ids in `selected`, preserving pool order.
///
/// An empty `selected` slice means "no restriction" and returns the pool
/// unchanged. Ids in `selected` that are not in the pool are ignored.
///
/// # Examples
///
/// ```
/// # use backend::domain::{CategoryId, SubCategory, effective_pool};
/// let pool = vec![
///     SubCategory::new(CategoryId::Science, "Fizik", "Madde"),
///     SubCategory::new(CategoryId::Science, "Kimya", "Element"),
/// ];
/// let chemistry = pool[1].id;
///
/// assert_eq!(effective_pool(pool.clone(), &[]).len(), 2);
/// let restricted = effective_pool(pool, &[chemistry]);
/// assert_eq!(restricted.len(), 1);
/// assert_eq!(restricted[0].name, "Kimya");
/// ```
pub fn effective_pool(pool: Vec<SubCategory>, selected: &[SubCategoryId]) -> Vec<SubCategory> {
    if selected.is_empty() {
        return pool;
    }
    let wanted: HashSet<&SubCategoryId> = selected.iter().collect();
    pool.into_iter()
        .filter(|record| wanted.contains(&record.id))
        .collect()
}

/// Map a unit draw onto an index into a collection of `len` items.
///
/// Computes `floor(unit * len)`. Returns `None` for an empty collection.
/// Out-of-range draws are clamped, and `NaN` maps to the first index, so the
/// result is always a valid index.
///
/// # Examples
///
/// ```
/// # use backend::domain::index_from_unit;
/// assert_eq!(index_from_unit(0.0, 15), Some(0));
/// assert_eq!(index_from_unit(0.5, 15), Some(7));
/// assert_eq!(index_from_unit(0.999_999, 15), Some(14));
/// assert_eq!(index_from_unit(0.5, 0), None);
/// ```
pub fn index_from_unit(unit: f64, len: usize) -> Option<usize> {
    let last = len.checked_sub(1)?;
    // Float-to-int casts saturate and map NaN to zero.
    let index = (unit * len as f64).floor() as usize;
    Some(index.min(last))
}

/// Resolves one sub-category per request.
///
/// Holds no state between calls; every draw reads the current pool.
#[derive(Clone)]
pub struct SelectionResolver<S> {
    sub_categories: Arc<S>,
    random: Arc<dyn RandomSource>,
}

impl<S> SelectionResolver<S> {
    /// Create a resolver over the given store and random source.
    pub fn new(sub_categories: Arc<S>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            sub_categories,
            random,
        }
    }

    /// Pick one category uniformly at random.
    pub fn random_category(&self) -> CategoryId {
        index_from_unit(self.random.next_unit(), CategoryId::ALL.len())
            .and_then(|index| CategoryId::ALL.get(index).copied())
            .unwrap_or(CategoryId::Software)
    }
}

impl<S> SelectionResolver<S>
where
    S: SubCategoryRepository,
{
    /// List the seeded pool for `category`, used to offer choices to users.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Repository`] when the store fails.
    pub async fn list_sub_categories(
        &self,
        category: CategoryId,
    ) -> Result<Vec<SubCategory>, SelectionError> {
        Ok(self.sub_categories.list_by_category(category).await?)
    }

    /// Resolve a sub-category for `category` honouring the user's selections.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoCandidates`] when the effective pool is
    /// empty, or [`SelectionError::Repository`] when the store fails.
    pub async fn resolve(
        &self,
        category: CategoryId,
        preferences: &UserSubCategoryPreferences,
    ) -> Result<SubCategory, SelectionError> {
        self.resolve_with_selection(category, preferences.selections_for(category))
            .await
    }

    /// Resolve a sub-category for `category` from an explicit selection.
    ///
    /// An empty `selected` slice draws from the full pool.
    ///
    /// # Errors
    ///
    /// See [`SelectionResolver::resolve`].
    pub async fn resolve_with_selection(
        &self,
        category: CategoryId,
        selected: &[SubCategoryId],
    ) -> Result<SubCategory, SelectionError> {
        let pool = self.sub_categories.list_by_category(category).await?;
        let pool_size = pool.len();
        let candidates = effective_pool(pool, selected);

        let unit = self.random.next_unit();
        let Some(index) = index_from_unit(unit, candidates.len()) else {
            debug!(
                %category,
                pool_size,
                selected = selected.len(),
                "effective sub-category pool is empty"
            );
            return Err(SelectionError::NoCandidates { category });
        };

        candidates
            .into_iter()
            .nth(index)
            .ok_or(SelectionError::NoCandidates { category })
    }

    /// Pick a random category, then resolve a sub-category within it.
    ///
    /// # Errors
    ///
    /// See [`SelectionResolver::resolve`].
    pub async fn resolve_any(
        &self,
        preferences: &UserSubCategoryPreferences,
    ) -> Result<SubCategory, SelectionError> {
        let category = self.random_category();
        self.resolve(category, preferences).await
    }
}
