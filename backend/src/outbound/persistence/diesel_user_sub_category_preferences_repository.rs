//! PostgreSQL-backed `UserSubCategoryPreferencesRepository`.
//!
//! Selections are stored as a JSONB object keyed by category storage key,
//! with each value a list of sub-category UUID strings.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    UserSubCategoryPreferencesRepository, UserSubCategoryPreferencesRepositoryError,
};
use crate::domain::{SubCategorySelections, UserId, UserSubCategoryPreferences};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserSubCategoryPreferencesRow, UserSubCategoryPreferencesRow};
use super::pool::DbPool;
use super::schema::user_sub_category_preferences;

/// Diesel-backed store for per-user sub-category selections.
#[derive(Clone)]
pub struct DieselUserSubCategoryPreferencesRepository {
    pool: DbPool,
}

impl DieselUserSubCategoryPreferencesRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> UserSubCategoryPreferencesRepositoryError {
    map_diesel_error(
        error,
        UserSubCategoryPreferencesRepositoryError::query,
        UserSubCategoryPreferencesRepositoryError::connection,
    )
}

fn row_to_preferences(
    row: UserSubCategoryPreferencesRow,
) -> Result<UserSubCategoryPreferences, UserSubCategoryPreferencesRepositoryError> {
    let selections: SubCategorySelections = serde_json::from_value(row.selections)
        .map_err(|err| UserSubCategoryPreferencesRepositoryError::corrupt(err.to_string()))?;
    Ok(
        UserSubCategoryPreferences::builder(UserId::from_uuid(row.user_id))
            .selections(selections)
            .updated_at(row.updated_at)
            .build(),
    )
}

fn preferences_to_row(
    preferences: &UserSubCategoryPreferences,
) -> Result<NewUserSubCategoryPreferencesRow, UserSubCategoryPreferencesRepositoryError> {
    let selections = serde_json::to_value(&preferences.selections)
        .map_err(|err| UserSubCategoryPreferencesRepositoryError::query(err.to_string()))?;
    Ok(NewUserSubCategoryPreferencesRow {
        user_id: *preferences.user_id.as_uuid(),
        selections,
        updated_at: preferences.updated_at,
    })
}

#[async_trait]
impl UserSubCategoryPreferencesRepository for DieselUserSubCategoryPreferencesRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserSubCategoryPreferences>, UserSubCategoryPreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            map_pool_error(err, UserSubCategoryPreferencesRepositoryError::connection)
        })?;

        let row: Option<UserSubCategoryPreferencesRow> = user_sub_category_preferences::table
            .filter(user_sub_category_preferences::user_id.eq(user_id.as_uuid()))
            .select(UserSubCategoryPreferencesRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_preferences).transpose()
    }

    async fn save(
        &self,
        preferences: &UserSubCategoryPreferences,
    ) -> Result<(), UserSubCategoryPreferencesRepositoryError> {
        let row = preferences_to_row(preferences)?;
        let mut conn = self.pool.get().await.map_err(|err| {
            map_pool_error(err, UserSubCategoryPreferencesRepositoryError::connection)
        })?;

        diesel::insert_into(user_sub_category_preferences::table)
            .values(&row)
            .on_conflict(user_sub_category_preferences::user_id)
            .do_update()
            .set((
                user_sub_category_preferences::selections
                    .eq(excluded(user_sub_category_preferences::selections)),
                user_sub_category_preferences::updated_at
                    .eq(excluded(user_sub_category_preferences::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(())
    }
}
