//! Internal Diesel row structs.
//!
//! Row types never leave the persistence layer; repositories convert them to
//! domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    collections, favourite_categories, initialization_flags, saved_snippets, snippet_votes,
    sub_categories, user_sub_category_preferences,
};

/// Row read from `sub_categories`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sub_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubCategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub parent_category: String,
}

/// Insertable `sub_categories` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sub_categories)]
pub(crate) struct NewSubCategoryRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub parent_category: &'a str,
}

/// Row read from `initialization_flags`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = initialization_flags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InitializationFlagRow {
    pub initialized: bool,
    pub last_updated: DateTime<Utc>,
}

/// Insertable `initialization_flags` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = initialization_flags)]
pub(crate) struct NewInitializationFlagRow<'a> {
    pub key: &'a str,
    pub initialized: bool,
    pub last_updated: DateTime<Utc>,
}

/// Row read from `user_sub_category_preferences`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_sub_category_preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserSubCategoryPreferencesRow {
    pub user_id: Uuid,
    pub selections: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Insertable `user_sub_category_preferences` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_sub_category_preferences)]
pub(crate) struct NewUserSubCategoryPreferencesRow {
    pub user_id: Uuid,
    pub selections: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Row in `collections`, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = collections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CollectionRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub icon: String,
    pub item_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Row in `saved_snippets`, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = saved_snippets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SavedSnippetRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub collection_id: Uuid,
    pub category: String,
    pub sub_category: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Row read from `snippet_votes`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = snippet_votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SnippetVoteRow {
    pub snippet_id: Uuid,
    pub voter_id: Uuid,
    pub kind: String,
}

/// Insertable `snippet_votes` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = snippet_votes)]
pub(crate) struct NewSnippetVoteRow<'a> {
    pub snippet_id: Uuid,
    pub voter_id: Uuid,
    pub kind: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row in `favourite_categories`, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = favourite_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FavouriteCategoriesRow {
    pub user_id: Uuid,
    pub categories: Vec<String>,
    pub updated_at: DateTime<Utc>,
}
