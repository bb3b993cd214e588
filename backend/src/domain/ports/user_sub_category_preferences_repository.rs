//! Port for user sub-category preference persistence.
//!
//! Records are keyed by user. Saving replaces the stored selection mapping
//! for that user (an upsert); records for other users are never touched.

use async_trait::async_trait;

use crate::domain::{UserId, UserSubCategoryPreferences};

use super::define_port_error;

define_port_error! {
    /// Errors raised by sub-category preference repository adapters.
    pub enum UserSubCategoryPreferencesRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "sub-category preferences connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "sub-category preferences query failed: {message}",
        /// A stored record could not be decoded.
        Corrupt { message: String } =>
            "sub-category preferences record is corrupt: {message}",
    }
}

/// Port for sub-category preference storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSubCategoryPreferencesRepository: Send + Sync {
    /// Fetch preferences for a user.
    ///
    /// Returns `None` if the user has never saved a selection.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserSubCategoryPreferences>, UserSubCategoryPreferencesRepositoryError>;

    /// Insert or replace the user's preferences.
    async fn save(
        &self,
        preferences: &UserSubCategoryPreferences,
    ) -> Result<(), UserSubCategoryPreferencesRepositoryError>;
}

/// Fixture implementation that stores nothing.
///
/// Lookups always return `None`, which callers treat as "no restriction".
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserSubCategoryPreferencesRepository;

#[async_trait]
impl UserSubCategoryPreferencesRepository for FixtureUserSubCategoryPreferencesRepository {
    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserSubCategoryPreferences>, UserSubCategoryPreferencesRepositoryError> {
        Ok(None)
    }

    async fn save(
        &self,
        _preferences: &UserSubCategoryPreferences,
    ) -> Result<(), UserSubCategoryPreferencesRepositoryError> {
        Ok(())
    }
}
