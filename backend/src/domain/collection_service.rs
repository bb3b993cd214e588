//! Collection management and the voted feed.
//!
//! [`CollectionService`] creates and deletes a user's collections and saves
//! generated snippets into them. [`FeedService`] lists every user's saved
//! snippets with their vote tallies and records votes.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::{
    CollectionRepository, CollectionRepositoryError, VoteRepository, VoteRepositoryError,
};
use crate::domain::{
    Collection, CollectionId, CollectionValidationError, FeedItem, SavedSnippet, SavedSnippetId,
    Snippet, UserId, Vote, VoteKind,
};

/// Errors raised by [`CollectionService`] and [`FeedService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Collection input was invalid.
    #[error(transparent)]
    Invalid(#[from] CollectionValidationError),
    /// The user has no collection with this id.
    #[error("collection {id} not found")]
    CollectionNotFound {
        /// Requested collection.
        id: CollectionId,
    },
    /// No saved snippet has this id.
    #[error("saved snippet {id} not found")]
    SnippetNotFound {
        /// Requested snippet.
        id: SavedSnippetId,
    },
    /// Collection storage failed.
    #[error(transparent)]
    Collections(#[from] CollectionRepositoryError),
    /// Vote storage failed.
    #[error(transparent)]
    Votes(#[from] VoteRepositoryError),
}

/// Service managing a user's collections and saved snippets.
#[derive(Clone)]
pub struct CollectionService<C> {
    collections: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> CollectionService<C> {
    /// Create a new service with the given repository and clock.
    pub fn new(collections: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { collections, clock }
    }
}

impl<C> CollectionService<C>
where
    C: CollectionRepository,
{
    /// Create an empty collection for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Invalid`] for a blank name and propagates
    /// repository failures.
    pub async fn create_collection(
        &self,
        owner: &UserId,
        name: &str,
        icon: Option<String>,
    ) -> Result<Collection, CollectionError> {
        let collection = Collection::new(owner.clone(), name, icon, self.clock.utc())?;
        self.collections.create(&collection).await?;
        debug!(owner = %owner, id = %collection.id, "created collection");
        Ok(collection)
    }

    /// List the owner's collections, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn collections_for(&self, owner: &UserId) -> Result<Vec<Collection>, CollectionError> {
        Ok(self.collections.list_for_owner(owner).await?)
    }

    /// Delete a collection and every snippet saved in it.
    ///
    /// Returns the number of snippets removed.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::CollectionNotFound`] when the owner has no
    /// such collection.
    pub async fn delete_collection(
        &self,
        owner: &UserId,
        id: CollectionId,
    ) -> Result<u64, CollectionError> {
        let removed = self
            .collections
            .delete(owner, &id)
            .await?
            .ok_or(CollectionError::CollectionNotFound { id })?;
        info!(owner = %owner, %id, removed, "deleted collection");
        Ok(removed)
    }

    /// Save a generated snippet into one of the owner's collections.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::CollectionNotFound`] when the owner has no
    /// such collection; nothing is written in that case.
    pub async fn save_snippet(
        &self,
        owner: &UserId,
        collection_id: CollectionId,
        snippet: &Snippet,
    ) -> Result<SavedSnippet, CollectionError> {
        let saved =
            SavedSnippet::from_snippet(owner.clone(), collection_id, snippet, self.clock.utc());
        if !self.collections.save_snippet(&saved).await? {
            return Err(CollectionError::CollectionNotFound { id: collection_id });
        }
        debug!(owner = %owner, collection = %collection_id, id = %saved.id, "saved snippet");
        Ok(saved)
    }

    /// Delete one of the owner's saved snippets.
    ///
    /// Deleting a snippet that no longer exists is not an error; the result
    /// reports whether anything was removed.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn delete_snippet(
        &self,
        owner: &UserId,
        id: SavedSnippetId,
    ) -> Result<bool, CollectionError> {
        let removed = self.collections.delete_snippet(owner, &id).await?;
        debug!(owner = %owner, %id, removed, "deleted snippet");
        Ok(removed)
    }

    /// List the owner's saved snippets, newest first.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn snippets_for(&self, owner: &UserId) -> Result<Vec<SavedSnippet>, CollectionError> {
        Ok(self.collections.list_snippets(owner).await?)
    }
}

/// Service listing the shared feed and recording votes.
#[derive(Clone)]
pub struct FeedService<C, V> {
    collections: Arc<C>,
    votes: Arc<V>,
}

impl<C, V> FeedService<C, V> {
    /// Create a new feed service.
    pub fn new(collections: Arc<C>, votes: Arc<V>) -> Self {
        Self { collections, votes }
    }
}

impl<C, V> FeedService<C, V>
where
    C: CollectionRepository,
    V: VoteRepository,
{
    /// List every saved snippet, newest first, tallied for `viewer`.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn feed(&self, viewer: Option<&UserId>) -> Result<Vec<FeedItem>, CollectionError> {
        let snippets = self.collections.list_feed().await?;
        let ids: Vec<SavedSnippetId> = snippets.iter().map(|snippet| snippet.id).collect();
        let votes = self.votes.votes_for(&ids).await?;
        Ok(snippets
            .into_iter()
            .map(|snippet| FeedItem::tally(snippet, &votes, viewer))
            .collect())
    }

    /// Set or clear `voter`'s vote on a saved snippet.
    ///
    /// `None` retracts any existing vote. Returns the snippet's updated
    /// tally as seen by the voter.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::SnippetNotFound`] when no snippet has this
    /// id.
    pub async fn vote(
        &self,
        voter: &UserId,
        snippet_id: SavedSnippetId,
        kind: Option<VoteKind>,
    ) -> Result<FeedItem, CollectionError> {
        let snippet = self
            .collections
            .find_snippet(&snippet_id)
            .await?
            .ok_or(CollectionError::SnippetNotFound { id: snippet_id })?;

        match kind {
            Some(kind) => {
                self.votes
                    .cast(&Vote {
                        snippet_id,
                        voter: voter.clone(),
                        kind,
                    })
                    .await?;
            }
            None => {
                self.votes.retract(&snippet_id, voter).await?;
            }
        }
        debug!(voter = %voter, snippet = %snippet_id, ?kind, "recorded vote");

        let votes = self.votes.votes_for(&[snippet_id]).await?;
        Ok(FeedItem::tally(snippet, &votes, Some(voter)))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for collection and feed orchestration.

    use super::*;
    use crate::domain::ports::{MockCollectionRepository, MockVoteRepository};
    use crate::domain::{CategoryId, SubCategory};
    use chrono::{DateTime, TimeZone, Utc};
    use mockable::MockClock;
    use rstest::{fixture, rstest};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn clock() -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_utc().returning(fixed_now);
        Arc::new(clock)
    }

    fn history_snippet() -> Snippet {
        Snippet {
            category: CategoryId::History,
            sub_category: SubCategory::new(CategoryId::History, "Antik Çağ", "İlk uygarlıklar"),
            content: "Sümerler yazıyı MÖ 3200 civarında kullanmaya başladı.".to_owned(),
        }
    }

    #[fixture]
    fn snippet() -> Snippet {
        history_snippet()
    }

    fn saved(owner: &UserId) -> SavedSnippet {
        SavedSnippet::from_snippet(owner.clone(), CollectionId::random(), &history_snippet(), fixed_now())
    }

    #[rstest]
    #[tokio::test]
    async fn create_collection_stamps_and_stores() {
        let owner = UserId::random();
        let mut repo = MockCollectionRepository::new();
        repo.expect_create()
            .withf(|collection| {
                collection.name == "Tarih Notları"
                    && collection.item_count == 0
                    && collection.created_at == fixed_now()
            })
            .times(1)
            .return_once(|_| Ok(()));

        let collection = CollectionService::new(Arc::new(repo), clock())
            .create_collection(&owner, "Tarih Notları", None)
            .await
            .expect("create succeeds");
        assert_eq!(collection.owner, owner);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_name_is_not_stored() {
        let mut repo = MockCollectionRepository::new();
        repo.expect_create().times(0);

        let error = CollectionService::new(Arc::new(repo), clock())
            .create_collection(&UserId::random(), " ", None)
            .await
            .expect_err("blank name");
        assert_eq!(
            error,
            CollectionError::Invalid(CollectionValidationError::BlankName)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn saving_into_a_missing_collection_fails(snippet: Snippet) {
        let mut repo = MockCollectionRepository::new();
        repo.expect_save_snippet().times(1).return_once(|_| Ok(false));
        let collection_id = CollectionId::random();

        let error = CollectionService::new(Arc::new(repo), clock())
            .save_snippet(&UserId::random(), collection_id, &snippet)
            .await
            .expect_err("collection is missing");
        assert_eq!(error, CollectionError::CollectionNotFound { id: collection_id });
    }

    #[rstest]
    #[tokio::test]
    async fn saved_snippet_carries_generated_content(snippet: Snippet) {
        let mut repo = MockCollectionRepository::new();
        repo.expect_save_snippet()
            .withf(|saved| saved.sub_category.as_deref() == Some("Antik Çağ"))
            .times(1)
            .return_once(|_| Ok(true));

        let saved = CollectionService::new(Arc::new(repo), clock())
            .save_snippet(&UserId::random(), CollectionId::random(), &snippet)
            .await
            .expect("save succeeds");
        assert_eq!(saved.content, snippet.content);
        assert_eq!(saved.created_at, fixed_now());
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_missing_collection_fails() {
        let mut repo = MockCollectionRepository::new();
        repo.expect_delete().return_once(|_, _| Ok(None));
        let id = CollectionId::random();

        let error = CollectionService::new(Arc::new(repo), clock())
            .delete_collection(&UserId::random(), id)
            .await
            .expect_err("collection is missing");
        assert_eq!(error, CollectionError::CollectionNotFound { id });
    }

    #[rstest]
    #[tokio::test]
    async fn vote_on_missing_snippet_is_rejected() {
        let mut collections = MockCollectionRepository::new();
        collections.expect_find_snippet().return_once(|_| Ok(None));
        let mut votes = MockVoteRepository::new();
        votes.expect_cast().times(0);
        let id = SavedSnippetId::random();

        let error = FeedService::new(Arc::new(collections), Arc::new(votes))
            .vote(&UserId::random(), id, Some(VoteKind::Up))
            .await
            .expect_err("snippet is missing");
        assert_eq!(error, CollectionError::SnippetNotFound { id });
    }

    #[rstest]
    #[tokio::test]
    async fn clearing_a_vote_retracts_it() {
        let voter = UserId::random();
        let item = saved(&UserId::random());
        let id = item.id;
        let mut collections = MockCollectionRepository::new();
        collections
            .expect_find_snippet()
            .return_once(move |_| Ok(Some(item)));
        let mut votes = MockVoteRepository::new();
        votes.expect_cast().times(0);
        votes.expect_retract().times(1).return_once(|_, _| Ok(true));
        votes.expect_votes_for().return_once(|_| Ok(Vec::new()));

        let tally = FeedService::new(Arc::new(collections), Arc::new(votes))
            .vote(&voter, id, None)
            .await
            .expect("retract succeeds");
        assert_eq!(tally.vote_count, 0);
        assert_eq!(tally.viewer_vote, None);
    }

    #[rstest]
    #[tokio::test]
    async fn feed_tallies_votes_per_item() {
        let viewer = UserId::random();
        let first = saved(&UserId::random());
        let second = saved(&viewer);
        let votes_list = vec![
            Vote {
                snippet_id: first.id,
                voter: viewer.clone(),
                kind: VoteKind::Up,
            },
            Vote {
                snippet_id: second.id,
                voter: UserId::random(),
                kind: VoteKind::Down,
            },
        ];
        let feed = vec![first.clone(), second.clone()];

        let mut collections = MockCollectionRepository::new();
        collections.expect_list_feed().return_once(move || Ok(feed));
        let mut votes = MockVoteRepository::new();
        votes
            .expect_votes_for()
            .withf(move |ids| ids.len() == 2)
            .return_once(move |_| Ok(votes_list));

        let items = FeedService::new(Arc::new(collections), Arc::new(votes))
            .feed(Some(&viewer))
            .await
            .expect("feed loads");
        let tallies: Vec<_> = items
            .iter()
            .map(|item| (item.snippet.id, item.vote_count, item.viewer_vote))
            .collect();
        assert_eq!(
            tallies,
            [
                (first.id, 1, Some(VoteKind::Up)),
                (second.id, -1, None)
            ]
        );
    }
}
