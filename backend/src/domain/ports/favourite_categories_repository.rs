//! Port for users' favourite categories.

use async_trait::async_trait;

use crate::domain::{FavouriteCategories, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by favourite category adapters.
    pub enum FavouriteCategoriesRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "favourite categories connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "favourite categories query failed: {message}",
        /// A stored record could not be decoded.
        Corrupt { message: String } =>
            "favourite categories record is corrupt: {message}",
    }
}

/// Storage for favourite categories, one record per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavouriteCategoriesRepository: Send + Sync {
    /// Fetch the user's favourites, or `None` when never saved.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<FavouriteCategories>, FavouriteCategoriesRepositoryError>;

    /// Insert or replace the user's favourites.
    async fn save(
        &self,
        favourites: &FavouriteCategories,
    ) -> Result<(), FavouriteCategoriesRepositoryError>;
}
