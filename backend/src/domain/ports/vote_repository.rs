//! Port for feed votes.
//!
//! A user holds at most one vote per saved snippet. Casting again replaces
//! the previous direction.

use async_trait::async_trait;

use crate::domain::{SavedSnippetId, UserId, Vote};

use super::define_port_error;

define_port_error! {
    /// Errors raised by vote repository adapters.
    pub enum VoteRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "vote repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "vote repository query failed: {message}",
        /// A stored vote could not be decoded.
        Corrupt { message: String } =>
            "vote record is corrupt: {message}",
    }
}

/// Storage for per-user votes on saved snippets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Record `vote`, replacing the voter's earlier vote on the same snippet.
    async fn cast(&self, vote: &Vote) -> Result<(), VoteRepositoryError>;

    /// Remove the voter's vote on a snippet. Returns `false` when none existed.
    async fn retract(
        &self,
        snippet_id: &SavedSnippetId,
        voter: &UserId,
    ) -> Result<bool, VoteRepositoryError>;

    /// List every vote on the given snippets.
    async fn votes_for(&self, snippet_ids: &[SavedSnippetId]) -> Result<Vec<Vote>, VoteRepositoryError>;
}
