//! Port for reading the seeded sub-category catalog.

use async_trait::async_trait;

use crate::domain::{CategoryId, SubCategory};

use super::define_port_error;

define_port_error! {
    /// Errors raised by sub-category read adapters.
    pub enum SubCategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "sub-category repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "sub-category repository query failed: {message}",
    }
}

/// Read access to seeded sub-categories.
///
/// The pool for a category is always every record whose parent category
/// matches; adapters return records in a stable order so a fixed random
/// draw selects the same record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubCategoryRepository: Send + Sync {
    /// List every sub-category belonging to `category`.
    ///
    /// Returns an empty list when the category has not been seeded.
    async fn list_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<SubCategory>, SubCategoryRepositoryError>;

    /// List every seeded sub-category.
    async fn list_all(&self) -> Result<Vec<SubCategory>, SubCategoryRepositoryError>;
}

/// Fixture implementation backed by a fixed list of records.
#[derive(Debug, Default, Clone)]
pub struct FixtureSubCategoryRepository {
    records: Vec<SubCategory>,
}

impl FixtureSubCategoryRepository {
    /// Create a fixture that serves the given records.
    pub fn new(records: Vec<SubCategory>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl SubCategoryRepository for FixtureSubCategoryRepository {
    async fn list_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<SubCategory>, SubCategoryRepositoryError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.parent_category == category)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<SubCategory>, SubCategoryRepositoryError> {
        Ok(self.records.clone())
    }
}
