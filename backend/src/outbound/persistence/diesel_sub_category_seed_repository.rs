//! PostgreSQL-backed sub-category seeding adapter.
//!
//! The reseed runs in a single transaction: the flag row is created if
//! missing, locked with `SELECT ... FOR UPDATE`, and only when it is still
//! unset are the existing records deleted, the new records inserted and the
//! flag set. A concurrent reseed blocks on the row lock and then observes the
//! flag as set.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    SeedingResult, SubCategorySeedRepository, SubCategorySeedRepositoryError,
    SubCategorySeedRequest,
};
use crate::domain::{InitializationFlag, SUB_CATEGORIES_FLAG_KEY, SubCategory};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{InitializationFlagRow, NewInitializationFlagRow, NewSubCategoryRow};
use super::pool::DbPool;
use super::schema::{initialization_flags, sub_categories};

/// Diesel-backed implementation of the sub-category seeding port.
#[derive(Clone)]
pub struct DieselSubCategorySeedRepository {
    pool: DbPool,
}

impl DieselSubCategorySeedRepository {
    /// Create a new seeding repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use backend::outbound::persistence::{
    ///     DbPool, DieselSubCategorySeedRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselSubCategorySeedRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> SubCategorySeedRepositoryError {
    map_diesel_error(
        error,
        SubCategorySeedRepositoryError::query,
        SubCategorySeedRepositoryError::connection,
    )
}

fn to_rows(records: &[SubCategory]) -> Vec<NewSubCategoryRow<'_>> {
    records
        .iter()
        .map(|record| NewSubCategoryRow {
            id: *record.id.as_uuid(),
            name: &record.name,
            description: &record.description,
            parent_category: record.parent_category.as_str(),
        })
        .collect()
}

#[async_trait]
impl SubCategorySeedRepository for DieselSubCategorySeedRepository {
    async fn load_flag(&self) -> Result<Option<InitializationFlag>, SubCategorySeedRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SubCategorySeedRepositoryError::connection))?;

        let row: Option<InitializationFlagRow> = initialization_flags::table
            .filter(initialization_flags::key.eq(SUB_CATEGORIES_FLAG_KEY))
            .select(InitializationFlagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        Ok(row.map(|row| InitializationFlag {
            initialized: row.initialized,
            last_updated: row.last_updated,
        }))
    }

    async fn reseed(
        &self,
        request: SubCategorySeedRequest,
    ) -> Result<SeedingResult, SubCategorySeedRepositoryError> {
        let SubCategorySeedRequest {
            records,
            initialized_at,
        } = request;
        let rows = to_rows(&records);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SubCategorySeedRepositoryError::connection))?;

        let result = conn
            .transaction(|conn| {
                async move {
                    let placeholder = NewInitializationFlagRow {
                        key: SUB_CATEGORIES_FLAG_KEY,
                        initialized: false,
                        last_updated: Utc::now(),
                    };
                    diesel::insert_into(initialization_flags::table)
                        .values(&placeholder)
                        .on_conflict(initialization_flags::key)
                        .do_nothing()
                        .execute(conn)
                        .await?;

                    let initialized: bool = initialization_flags::table
                        .filter(initialization_flags::key.eq(SUB_CATEGORIES_FLAG_KEY))
                        .select(initialization_flags::initialized)
                        .for_update()
                        .first(conn)
                        .await?;

                    if initialized {
                        return Ok(SeedingResult::AlreadySeeded);
                    }

                    let wiped = diesel::delete(sub_categories::table).execute(conn).await?;
                    debug!(wiped, "cleared existing sub-categories");

                    if !rows.is_empty() {
                        diesel::insert_into(sub_categories::table)
                            .values(&rows)
                            .execute(conn)
                            .await?;
                    }

                    diesel::update(
                        initialization_flags::table
                            .filter(initialization_flags::key.eq(SUB_CATEGORIES_FLAG_KEY)),
                    )
                    .set((
                        initialization_flags::initialized.eq(true),
                        initialization_flags::last_updated.eq(initialized_at),
                    ))
                    .execute(conn)
                    .await?;

                    Ok(SeedingResult::Applied)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        Ok(result)
    }
}
