//! PostgreSQL-backed `SubCategoryRepository`.

use std::cmp::Ordering;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{SubCategoryRepository, SubCategoryRepositoryError};
use crate::domain::{CategoryId, SubCategory, SubCategoryId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::SubCategoryRow;
use super::pool::DbPool;
use super::schema::sub_categories;

/// Diesel-backed reader over the seeded sub-category table.
#[derive(Clone)]
pub struct DieselSubCategoryRepository {
    pool: DbPool,
}

impl DieselSubCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> SubCategoryRepositoryError {
    map_diesel_error(
        error,
        SubCategoryRepositoryError::query,
        SubCategoryRepositoryError::connection,
    )
}

/// Convert rows to domain records, skipping rows with an unknown category.
///
/// The result is sorted with `order`, so pool order never depends on the
/// database collation.
fn rows_to_records(
    rows: Vec<SubCategoryRow>,
    order: fn(&SubCategory, &SubCategory) -> Ordering,
) -> Vec<SubCategory> {
    let mut records: Vec<_> = rows
        .into_iter()
        .filter_map(|row| match row.parent_category.parse::<CategoryId>() {
            Ok(parent_category) => Some(SubCategory {
                id: SubCategoryId::from_uuid(row.id),
                name: row.name,
                description: row.description,
                parent_category,
            }),
            Err(error) => {
                warn!(id = %row.id, %error, "skipping sub-category with unknown category");
                None
            }
        })
        .collect();
    records.sort_by(order);
    records
}

#[async_trait]
impl SubCategoryRepository for DieselSubCategoryRepository {
    async fn list_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<SubCategory>, SubCategoryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SubCategoryRepositoryError::connection))?;

        let rows: Vec<SubCategoryRow> = sub_categories::table
            .filter(sub_categories::parent_category.eq(category.as_str()))
            .order((sub_categories::name.asc(), sub_categories::id.asc()))
            .select(SubCategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(rows_to_records(rows, SubCategory::pool_order))
    }

    async fn list_all(&self) -> Result<Vec<SubCategory>, SubCategoryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SubCategoryRepositoryError::connection))?;

        let rows: Vec<SubCategoryRow> = sub_categories::table
            .order((
                sub_categories::parent_category.asc(),
                sub_categories::name.asc(),
                sub_categories::id.asc(),
            ))
            .select(SubCategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(rows_to_records(rows, SubCategory::catalog_order))
    }
}
