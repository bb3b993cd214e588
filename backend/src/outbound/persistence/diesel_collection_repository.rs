//! PostgreSQL-backed `CollectionRepository`.
//!
//! Snippet writes lock the owning collection row with `SELECT ... FOR UPDATE`
//! and adjust `item_count` in the same transaction, so concurrent saves and
//! deletes never lose an update. Deleting a collection removes its snippets
//! first; their votes go with them through `ON DELETE CASCADE`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{CollectionRepository, CollectionRepositoryError};
use crate::domain::{
    CategoryId, Collection, CollectionId, SavedSnippet, SavedSnippetId, UserId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CollectionRow, SavedSnippetRow};
use super::pool::DbPool;
use super::schema::{collections, saved_snippets};

/// Diesel-backed store for collections and saved snippets.
#[derive(Clone)]
pub struct DieselCollectionRepository {
    pool: DbPool,
}

impl DieselCollectionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> CollectionRepositoryError {
    map_diesel_error(
        error,
        CollectionRepositoryError::query,
        CollectionRepositoryError::connection,
    )
}

fn row_to_collection(row: CollectionRow) -> Result<Collection, CollectionRepositoryError> {
    let item_count = u32::try_from(row.item_count).map_err(|_| {
        CollectionRepositoryError::corrupt(format!(
            "collection {} has item count {}",
            row.id, row.item_count
        ))
    })?;
    Ok(Collection {
        id: CollectionId::from_uuid(row.id),
        owner: UserId::from_uuid(row.owner_id),
        name: row.name,
        icon: row.icon,
        item_count,
        created_at: row.created_at,
    })
}

fn collection_to_row(collection: &Collection) -> Result<CollectionRow, CollectionRepositoryError> {
    let item_count = i32::try_from(collection.item_count).map_err(|_| {
        CollectionRepositoryError::query(format!(
            "item count {} does not fit the column",
            collection.item_count
        ))
    })?;
    Ok(CollectionRow {
        id: *collection.id.as_uuid(),
        owner_id: *collection.owner.as_uuid(),
        name: collection.name.clone(),
        icon: collection.icon.clone(),
        item_count,
        created_at: collection.created_at,
    })
}

fn row_to_snippet(row: SavedSnippetRow) -> Result<SavedSnippet, CollectionRepositoryError> {
    let category = row.category.parse::<CategoryId>().map_err(|err| {
        CollectionRepositoryError::corrupt(format!("saved snippet {}: {err}", row.id))
    })?;
    Ok(SavedSnippet {
        id: SavedSnippetId::from_uuid(row.id),
        owner: UserId::from_uuid(row.owner_id),
        collection_id: CollectionId::from_uuid(row.collection_id),
        category,
        sub_category: row.sub_category,
        content: row.content,
        created_at: row.created_at,
    })
}

fn snippet_to_row(snippet: &SavedSnippet) -> SavedSnippetRow {
    SavedSnippetRow {
        id: *snippet.id.as_uuid(),
        owner_id: *snippet.owner.as_uuid(),
        collection_id: *snippet.collection_id.as_uuid(),
        category: snippet.category.as_str().to_owned(),
        sub_category: snippet.sub_category.clone(),
        content: snippet.content.clone(),
        created_at: snippet.created_at,
    }
}

fn rows_to_snippets(
    rows: Vec<SavedSnippetRow>,
) -> Result<Vec<SavedSnippet>, CollectionRepositoryError> {
    rows.into_iter().map(row_to_snippet).collect()
}

impl DieselCollectionRepository {
    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, AsyncPgConnection>, CollectionRepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CollectionRepositoryError::connection))
    }
}

#[async_trait]
impl CollectionRepository for DieselCollectionRepository {
    async fn create(&self, collection: &Collection) -> Result<(), CollectionRepositoryError> {
        let row = collection_to_row(collection)?;
        let mut conn = self.connection().await?;
        diesel::insert_into(collections::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Collection>, CollectionRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<CollectionRow> = collections::table
            .filter(collections::owner_id.eq(owner.as_uuid()))
            .order((collections::created_at.asc(), collections::id.asc()))
            .select(CollectionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_collection).collect()
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &CollectionId,
    ) -> Result<Option<Collection>, CollectionRepositoryError> {
        let mut conn = self.connection().await?;
        let row: Option<CollectionRow> = collections::table
            .filter(collections::id.eq(id.as_uuid()))
            .filter(collections::owner_id.eq(owner.as_uuid()))
            .select(CollectionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_collection).transpose()
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &CollectionId,
    ) -> Result<Option<u64>, CollectionRepositoryError> {
        let owner_id = *owner.as_uuid();
        let collection_id = *id.as_uuid();
        let mut conn = self.connection().await?;

        let removed = conn
            .transaction(|conn| {
                async move {
                    let locked: Option<Uuid> = collections::table
                        .filter(collections::id.eq(collection_id))
                        .filter(collections::owner_id.eq(owner_id))
                        .select(collections::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(None);
                    }

                    let removed = diesel::delete(
                        saved_snippets::table
                            .filter(saved_snippets::collection_id.eq(collection_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(collections::table.filter(collections::id.eq(collection_id)))
                        .execute(conn)
                        .await?;
                    Ok(Some(removed as u64))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        debug!(%collection_id, ?removed, "collection delete finished");
        Ok(removed)
    }

    async fn save_snippet(&self, snippet: &SavedSnippet) -> Result<bool, CollectionRepositoryError> {
        let row = snippet_to_row(snippet);
        let mut conn = self.connection().await?;

        conn.transaction(|conn| {
            async move {
                let count: Option<i32> = collections::table
                    .filter(collections::id.eq(row.collection_id))
                    .filter(collections::owner_id.eq(row.owner_id))
                    .select(collections::item_count)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(count) = count else {
                    return Ok(false);
                };

                diesel::insert_into(saved_snippets::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::update(collections::table.filter(collections::id.eq(row.collection_id)))
                    .set(collections::item_count.eq(count.saturating_add(1)))
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_error)
    }

    async fn delete_snippet(
        &self,
        owner: &UserId,
        id: &SavedSnippetId,
    ) -> Result<bool, CollectionRepositoryError> {
        let owner_id = *owner.as_uuid();
        let snippet_id = *id.as_uuid();
        let mut conn = self.connection().await?;

        conn.transaction(|conn| {
            async move {
                let collection_id: Option<Uuid> = saved_snippets::table
                    .filter(saved_snippets::id.eq(snippet_id))
                    .filter(saved_snippets::owner_id.eq(owner_id))
                    .select(saved_snippets::collection_id)
                    .first(conn)
                    .await
                    .optional()?;
                let Some(collection_id) = collection_id else {
                    return Ok(false);
                };

                let count: Option<i32> = collections::table
                    .filter(collections::id.eq(collection_id))
                    .select(collections::item_count)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;

                let deleted =
                    diesel::delete(saved_snippets::table.filter(saved_snippets::id.eq(snippet_id)))
                        .execute(conn)
                        .await?;
                if deleted == 0 {
                    return Ok(false);
                }

                if let Some(count) = count {
                    diesel::update(collections::table.filter(collections::id.eq(collection_id)))
                        .set(collections::item_count.eq((count - 1).max(0)))
                        .execute(conn)
                        .await?;
                }
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_error)
    }

    async fn find_snippet(
        &self,
        id: &SavedSnippetId,
    ) -> Result<Option<SavedSnippet>, CollectionRepositoryError> {
        let mut conn = self.connection().await?;
        let row: Option<SavedSnippetRow> = saved_snippets::table
            .filter(saved_snippets::id.eq(id.as_uuid()))
            .select(SavedSnippetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_snippet).transpose()
    }

    async fn list_snippets(
        &self,
        owner: &UserId,
    ) -> Result<Vec<SavedSnippet>, CollectionRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<SavedSnippetRow> = saved_snippets::table
            .filter(saved_snippets::owner_id.eq(owner.as_uuid()))
            .order((saved_snippets::created_at.desc(), saved_snippets::id.desc()))
            .select(SavedSnippetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_snippets(rows)
    }

    async fn list_feed(&self) -> Result<Vec<SavedSnippet>, CollectionRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<SavedSnippetRow> = saved_snippets::table
            .order((saved_snippets::created_at.desc(), saved_snippets::id.desc()))
            .select(SavedSnippetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_snippets(rows)
    }
}
