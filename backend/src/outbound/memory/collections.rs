//! Collection, vote and favourite ports for the in-memory store.

use async_trait::async_trait;

use super::InMemoryDiscoveryStore;
use crate::domain::ports::{
    CollectionRepository, CollectionRepositoryError, FavouriteCategoriesRepository,
    FavouriteCategoriesRepositoryError, VoteRepository, VoteRepositoryError,
};
use crate::domain::{
    Collection, CollectionId, FavouriteCategories, SavedSnippet, SavedSnippetId, UserId, Vote,
};

fn newest_first(mut snippets: Vec<SavedSnippet>) -> Vec<SavedSnippet> {
    snippets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    snippets
}

#[async_trait]
impl CollectionRepository for InMemoryDiscoveryStore {
    async fn create(&self, collection: &Collection) -> Result<(), CollectionRepositoryError> {
        let mut state = self.state.lock().await;
        if state.collections.iter().any(|c| c.id == collection.id) {
            return Err(CollectionRepositoryError::query(format!(
                "collection {} already exists",
                collection.id
            )));
        }
        state.collections.push(collection.clone());
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Collection>, CollectionRepositoryError> {
        let state = self.state.lock().await;
        let mut owned: Vec<_> = state
            .collections
            .iter()
            .filter(|c| &c.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &CollectionId,
    ) -> Result<Option<Collection>, CollectionRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .collections
            .iter()
            .find(|c| &c.id == id && &c.owner == owner)
            .cloned())
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &CollectionId,
    ) -> Result<Option<u64>, CollectionRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(position) = state
            .collections
            .iter()
            .position(|c| &c.id == id && &c.owner == owner)
        else {
            return Ok(None);
        };
        state.collections.remove(position);

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.snippets)
            .into_iter()
            .partition(|snippet| &snippet.collection_id == id);
        state.snippets = kept;
        state
            .votes
            .retain(|vote| !removed.iter().any(|snippet| snippet.id == vote.snippet_id));
        Ok(Some(removed.len() as u64))
    }

    async fn save_snippet(&self, snippet: &SavedSnippet) -> Result<bool, CollectionRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(collection) = state
            .collections
            .iter_mut()
            .find(|c| c.id == snippet.collection_id && c.owner == snippet.owner)
        else {
            return Ok(false);
        };
        collection.item_count = collection.item_count.saturating_add(1);
        state.snippets.push(snippet.clone());
        Ok(true)
    }

    async fn delete_snippet(
        &self,
        owner: &UserId,
        id: &SavedSnippetId,
    ) -> Result<bool, CollectionRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(position) = state
            .snippets
            .iter()
            .position(|s| &s.id == id && &s.owner == owner)
        else {
            return Ok(false);
        };
        let removed = state.snippets.remove(position);
        state.votes.retain(|vote| &vote.snippet_id != id);
        if let Some(collection) = state
            .collections
            .iter_mut()
            .find(|c| c.id == removed.collection_id)
        {
            collection.item_count = collection.item_count.saturating_sub(1);
        }
        Ok(true)
    }

    async fn find_snippet(
        &self,
        id: &SavedSnippetId,
    ) -> Result<Option<SavedSnippet>, CollectionRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.snippets.iter().find(|s| &s.id == id).cloned())
    }

    async fn list_snippets(
        &self,
        owner: &UserId,
    ) -> Result<Vec<SavedSnippet>, CollectionRepositoryError> {
        let state = self.state.lock().await;
        let owned = state
            .snippets
            .iter()
            .filter(|s| &s.owner == owner)
            .cloned()
            .collect();
        Ok(newest_first(owned))
    }

    async fn list_feed(&self) -> Result<Vec<SavedSnippet>, CollectionRepositoryError> {
        Ok(newest_first(self.state.lock().await.snippets.clone()))
    }
}

#[async_trait]
impl VoteRepository for InMemoryDiscoveryStore {
    async fn cast(&self, vote: &Vote) -> Result<(), VoteRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.snippets.iter().any(|s| s.id == vote.snippet_id) {
            return Err(VoteRepositoryError::query(format!(
                "saved snippet {} does not exist",
                vote.snippet_id
            )));
        }
        let existing = state
            .votes
            .iter()
            .position(|v| v.snippet_id == vote.snippet_id && v.voter == vote.voter);
        match existing {
            Some(index) => state.votes[index].kind = vote.kind,
            None => state.votes.push(vote.clone()),
        }
        Ok(())
    }

    async fn retract(
        &self,
        snippet_id: &SavedSnippetId,
        voter: &UserId,
    ) -> Result<bool, VoteRepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.votes.len();
        state
            .votes
            .retain(|v| !(&v.snippet_id == snippet_id && &v.voter == voter));
        Ok(state.votes.len() < before)
    }

    async fn votes_for(&self, snippet_ids: &[SavedSnippetId]) -> Result<Vec<Vote>, VoteRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .votes
            .iter()
            .filter(|v| snippet_ids.contains(&v.snippet_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FavouriteCategoriesRepository for InMemoryDiscoveryStore {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<FavouriteCategories>, FavouriteCategoriesRepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .favourites
            .get(user_id.as_uuid())
            .cloned())
    }

    async fn save(
        &self,
        favourites: &FavouriteCategories,
    ) -> Result<(), FavouriteCategoriesRepositoryError> {
        self.state
            .lock()
            .await
            .favourites
            .insert(*favourites.user_id.as_uuid(), favourites.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryId, VoteKind};
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn collection(owner: &UserId) -> Collection {
        Collection::new(owner.clone(), "Bilim", None, Utc::now()).expect("valid name")
    }

    fn snippet(collection: &Collection) -> SavedSnippet {
        SavedSnippet {
            id: SavedSnippetId::random(),
            owner: collection.owner.clone(),
            collection_id: collection.id,
            category: CategoryId::Science,
            sub_category: Some("Fizik".to_owned()),
            content: "Ses havada saniyede yaklaşık 343 metre ilerler.".to_owned(),
            created_at: Utc::now(),
        }
    }

    async fn item_count(store: &InMemoryDiscoveryStore, collection: &Collection) -> u32 {
        store
            .find(&collection.owner, &collection.id)
            .await
            .expect("find")
            .expect("collection exists")
            .item_count
    }

    #[rstest]
    #[tokio::test]
    async fn saving_and_deleting_snippets_tracks_item_count() {
        let store = InMemoryDiscoveryStore::new();
        let owner = UserId::random();
        let target = collection(&owner);
        store.create(&target).await.expect("create");
        let first = snippet(&target);
        let second = snippet(&target);

        assert!(store.save_snippet(&first).await.expect("save"));
        assert!(store.save_snippet(&second).await.expect("save"));
        assert_eq!(item_count(&store, &target).await, 2);

        assert!(store.delete_snippet(&owner, &first.id).await.expect("delete"));
        assert!(!store.delete_snippet(&owner, &first.id).await.expect("delete"));
        assert_eq!(item_count(&store, &target).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn item_count_never_goes_below_zero() {
        let store = InMemoryDiscoveryStore::new();
        let owner = UserId::random();
        let target = collection(&owner);
        store.create(&target).await.expect("create");
        let orphan = snippet(&target);
        store.state.lock().await.snippets.push(orphan.clone());

        assert!(store.delete_snippet(&owner, &orphan.id).await.expect("delete"));
        assert_eq!(item_count(&store, &target).await, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn saving_into_another_users_collection_writes_nothing() {
        let store = InMemoryDiscoveryStore::new();
        let target = collection(&UserId::random());
        store.create(&target).await.expect("create");
        let mut intruder = snippet(&target);
        intruder.owner = UserId::random();

        assert!(!store.save_snippet(&intruder).await.expect("save"));
        assert_eq!(item_count(&store, &target).await, 0);
        assert!(store.list_feed().await.expect("feed").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_collection_removes_its_snippets_and_votes() {
        let store = InMemoryDiscoveryStore::new();
        let owner = UserId::random();
        let doomed = collection(&owner);
        let kept = collection(&owner);
        store.create(&doomed).await.expect("create");
        store.create(&kept).await.expect("create");
        let gone = snippet(&doomed);
        let stays = snippet(&kept);
        for item in [&gone, &snippet(&doomed), &stays] {
            store.save_snippet(item).await.expect("save");
        }
        store
            .cast(&Vote {
                snippet_id: gone.id,
                voter: UserId::random(),
                kind: VoteKind::Up,
            })
            .await
            .expect("vote");

        let removed = store.delete(&owner, &doomed.id).await.expect("delete");

        assert_eq!(removed, Some(2));
        let remaining: Vec<_> = store
            .list_snippets(&owner)
            .await
            .expect("list")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(remaining, [stays.id]);
        assert!(store.votes_for(&[gone.id]).await.expect("votes").is_empty());
        assert_eq!(store.delete(&owner, &doomed.id).await.expect("delete"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn feed_lists_newest_first() {
        let store = InMemoryDiscoveryStore::new();
        let target = collection(&UserId::random());
        store.create(&target).await.expect("create");
        let mut older = snippet(&target);
        older.created_at = Utc::now() - Duration::minutes(5);
        let newer = snippet(&target);
        store.save_snippet(&older).await.expect("save");
        store.save_snippet(&newer).await.expect("save");

        let ids: Vec<_> = store
            .list_feed()
            .await
            .expect("feed")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, [newer.id, older.id]);
    }

    #[rstest]
    #[tokio::test]
    async fn voting_again_replaces_the_previous_vote() {
        let store = InMemoryDiscoveryStore::new();
        let target = collection(&UserId::random());
        store.create(&target).await.expect("create");
        let item = snippet(&target);
        store.save_snippet(&item).await.expect("save");
        let voter = UserId::random();

        for kind in [VoteKind::Up, VoteKind::Down] {
            store
                .cast(&Vote {
                    snippet_id: item.id,
                    voter: voter.clone(),
                    kind,
                })
                .await
                .expect("vote");
        }

        let votes = store.votes_for(&[item.id]).await.expect("votes");
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].kind, VoteKind::Down);
        assert!(store.retract(&item.id, &voter).await.expect("retract"));
        assert!(!store.retract(&item.id, &voter).await.expect("retract"));
    }

    #[rstest]
    #[tokio::test]
    async fn favourites_are_replaced_per_user() {
        let store = InMemoryDiscoveryStore::new();
        let user = UserId::random();
        let first = FavouriteCategories::new(user.clone(), [CategoryId::Art], Utc::now());
        let second = FavouriteCategories::new(user.clone(), [CategoryId::Software], Utc::now());

        store.save(&first).await.expect("save");
        store.save(&second).await.expect("save");

        assert_eq!(
            FavouriteCategoriesRepository::find_by_user_id(&store, &user)
                .await
                .expect("find"),
            Some(second)
        );
    }
}
