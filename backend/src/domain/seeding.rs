//! Sub-category seeding orchestration.
//!
//! Converts the authored catalog into typed records, then delegates the
//! guarded wipe-and-reseed to the seeding repository port. Seeding happens at
//! most once per seed epoch: once the initialisation flag is set, repeated
//! calls return without touching the store.

use std::sync::Arc;

use mockable::Clock;
use subcategory_catalog::{CatalogError, SubCategoryCatalog};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::{
    SeedingResult, SubCategorySeedRepository, SubCategorySeedRepositoryError,
    SubCategorySeedRequest,
};
use crate::domain::{CategoryId, SubCategory};

/// Errors raised while mapping an authored catalog onto [`CategoryId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedCatalogError {
    /// The catalog itself failed to load or validate.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// The catalog declares a category outside the fixed enumeration.
    #[error("catalog declares unknown category '{key}'")]
    UnknownCategory {
        /// The unrecognised category key.
        key: String,
    },
    /// The catalog omits one of the fixed categories.
    #[error("catalog has no entries for category '{category}'")]
    MissingCategory {
        /// The category with no entries.
        category: CategoryId,
    },
}

/// One authored sub-category, typed by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    /// Owning category.
    pub category: CategoryId,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
}

/// Authored catalog covering every [`CategoryId`].
///
/// # Examples
///
/// ```
/// # use backend::domain::SeedCatalog;
/// let catalog = SeedCatalog::embedded().expect("bundled catalog is complete");
/// assert_eq!(catalog.len(), 180);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCatalog {
    entries: Vec<SeedEntry>,
}

impl SeedCatalog {
    /// Load the catalog bundled with the `subcategory-catalog` crate.
    pub fn embedded() -> Result<Self, SeedCatalogError> {
        let catalog = SubCategoryCatalog::embedded()?;
        Self::try_from(&catalog)
    }

    /// Authored entries in catalog order.
    pub fn entries(&self) -> &[SeedEntry] {
        &self.entries
    }

    /// Number of authored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materialise every entry as a record with a fresh identifier.
    pub fn instantiate(&self) -> Vec<SubCategory> {
        self.entries
            .iter()
            .map(|entry| SubCategory::new(entry.category, &entry.name, &entry.description))
            .collect()
    }
}

impl TryFrom<&SubCategoryCatalog> for SeedCatalog {
    type Error = SeedCatalogError;

    fn try_from(catalog: &SubCategoryCatalog) -> Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(catalog.entry_count());
        for block in catalog.categories() {
            let category: CategoryId =
                block
                    .key()
                    .parse()
                    .map_err(|_| SeedCatalogError::UnknownCategory {
                        key: block.key().to_owned(),
                    })?;
            entries.extend(block.entries().iter().map(|entry| SeedEntry {
                category,
                name: entry.name().to_owned(),
                description: entry.description().to_owned(),
            }));
        }

        if let Some(category) = CategoryId::ALL
            .into_iter()
            .find(|category| !entries.iter().any(|entry| entry.category == *category))
        {
            return Err(SeedCatalogError::MissingCategory { category });
        }

        Ok(Self { entries })
    }
}

/// Result of a call to [`SubCategorySeeder::ensure_seeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Whether this call performed the reseed.
    pub result: SeedingResult,
    /// Number of records written; zero when already seeded.
    pub inserted: usize,
}

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedingError {
    /// Persistence adapter failed while reading the flag or reseeding.
    #[error("sub-category seeding persistence error: {0}")]
    Persistence(#[from] SubCategorySeedRepositoryError),
}

/// Service that guarantees the sub-category catalog is seeded exactly once
/// per seed epoch.
#[derive(Clone)]
pub struct SubCategorySeeder<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> SubCategorySeeder<R> {
    /// Create a new seeder with the given persistence adapter and clock.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> SubCategorySeeder<R>
where
    R: SubCategorySeedRepository,
{
    /// Seed the catalog unless the initialisation flag is already set.
    ///
    /// When the flag is absent or unset, every existing sub-category is
    /// deleted, `catalog` is inserted with fresh identifiers, and the flag is
    /// set, all through one adapter call. Failures are returned unchanged;
    /// the flag then stays unset so the next call retries.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Persistence`] when the adapter fails.
    pub async fn ensure_seeded(&self, catalog: &SeedCatalog) -> Result<SeedOutcome, SeedingError> {
        let flag = self.repository.load_flag().await?;
        if flag.is_some_and(|flag| flag.initialized) {
            debug!("sub-category catalog already initialised");
            return Ok(SeedOutcome {
                result: SeedingResult::AlreadySeeded,
                inserted: 0,
            });
        }

        let records = catalog.instantiate();
        let count = records.len();
        let request = SubCategorySeedRequest {
            records,
            initialized_at: self.clock.utc(),
        };
        let result = self.repository.reseed(request).await?;

        let inserted = match result {
            SeedingResult::Applied => {
                info!(inserted = count, "sub-category catalog seeded");
                count
            }
            SeedingResult::AlreadySeeded => {
                info!("sub-category catalog claimed by a concurrent seeder; skipping");
                0
            }
        };

        Ok(SeedOutcome { result, inserted })
    }
}
