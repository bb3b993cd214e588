//! PostgreSQL-backed `FavouriteCategoriesRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FavouriteCategoriesRepository, FavouriteCategoriesRepositoryError};
use crate::domain::{CategoryId, FavouriteCategories, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::FavouriteCategoriesRow;
use super::pool::DbPool;
use super::schema::favourite_categories;

/// Diesel-backed store for favourite categories.
#[derive(Clone)]
pub struct DieselFavouriteCategoriesRepository {
    pool: DbPool,
}

impl DieselFavouriteCategoriesRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> FavouriteCategoriesRepositoryError {
    map_diesel_error(
        error,
        FavouriteCategoriesRepositoryError::query,
        FavouriteCategoriesRepositoryError::connection,
    )
}

fn row_to_favourites(
    row: FavouriteCategoriesRow,
) -> Result<FavouriteCategories, FavouriteCategoriesRepositoryError> {
    let categories = row
        .categories
        .iter()
        .map(|key| key.parse::<CategoryId>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| FavouriteCategoriesRepositoryError::corrupt(err.to_string()))?;
    Ok(FavouriteCategories::new(
        UserId::from_uuid(row.user_id),
        categories,
        row.updated_at,
    ))
}

fn favourites_to_row(favourites: &FavouriteCategories) -> FavouriteCategoriesRow {
    FavouriteCategoriesRow {
        user_id: *favourites.user_id.as_uuid(),
        categories: favourites
            .categories
            .iter()
            .map(|category| category.as_str().to_owned())
            .collect(),
        updated_at: favourites.updated_at,
    }
}

#[async_trait]
impl FavouriteCategoriesRepository for DieselFavouriteCategoriesRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<FavouriteCategories>, FavouriteCategoriesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            map_pool_error(err, FavouriteCategoriesRepositoryError::connection)
        })?;

        let row: Option<FavouriteCategoriesRow> = favourite_categories::table
            .filter(favourite_categories::user_id.eq(user_id.as_uuid()))
            .select(FavouriteCategoriesRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_favourites).transpose()
    }

    async fn save(
        &self,
        favourites: &FavouriteCategories,
    ) -> Result<(), FavouriteCategoriesRepositoryError> {
        let row = favourites_to_row(favourites);
        let mut conn = self.pool.get().await.map_err(|err| {
            map_pool_error(err, FavouriteCategoriesRepositoryError::connection)
        })?;

        diesel::insert_into(favourite_categories::table)
            .values(&row)
            .on_conflict(favourite_categories::user_id)
            .do_update()
            .set((
                favourite_categories::categories.eq(excluded(favourite_categories::categories)),
                favourite_categories::updated_at.eq(excluded(favourite_categories::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(())
    }
}
