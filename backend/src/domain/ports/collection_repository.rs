//! Port for user collections and the snippets saved into them.
//!
//! Adapters keep each collection's `item_count` in step with its snippets:
//! saving a snippet increments the count and deleting one decrements it,
//! never below zero, in the same unit of work as the snippet write.

use async_trait::async_trait;

use crate::domain::{Collection, CollectionId, SavedSnippet, SavedSnippetId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by collection repository adapters.
    pub enum CollectionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "collection repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "collection repository query failed: {message}",
        /// A stored record could not be decoded.
        Corrupt { message: String } =>
            "collection record is corrupt: {message}",
    }
}

/// Storage for collections and saved snippets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Insert a new collection.
    async fn create(&self, collection: &Collection) -> Result<(), CollectionRepositoryError>;

    /// List the owner's collections, oldest first.
    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Collection>, CollectionRepositoryError>;

    /// Fetch one of the owner's collections.
    async fn find(
        &self,
        owner: &UserId,
        id: &CollectionId,
    ) -> Result<Option<Collection>, CollectionRepositoryError>;

    /// Delete a collection together with every snippet saved in it.
    ///
    /// Returns the number of snippets removed, or `None` when the owner has
    /// no such collection, in which case nothing is deleted.
    async fn delete(
        &self,
        owner: &UserId,
        id: &CollectionId,
    ) -> Result<Option<u64>, CollectionRepositoryError>;

    /// Insert a snippet and increment its collection's item count.
    ///
    /// Returns `false` without writing when the snippet's owner has no such
    /// collection.
    async fn save_snippet(&self, snippet: &SavedSnippet) -> Result<bool, CollectionRepositoryError>;

    /// Delete a snippet and decrement its collection's item count.
    ///
    /// Returns `false` when the owner has no such snippet.
    async fn delete_snippet(
        &self,
        owner: &UserId,
        id: &SavedSnippetId,
    ) -> Result<bool, CollectionRepositoryError>;

    /// Fetch any user's saved snippet by id.
    async fn find_snippet(
        &self,
        id: &SavedSnippetId,
    ) -> Result<Option<SavedSnippet>, CollectionRepositoryError>;

    /// List the owner's saved snippets, newest first.
    async fn list_snippets(
        &self,
        owner: &UserId,
    ) -> Result<Vec<SavedSnippet>, CollectionRepositoryError>;

    /// List every user's saved snippets, newest first.
    async fn list_feed(&self) -> Result<Vec<SavedSnippet>, CollectionRepositoryError>;
}
