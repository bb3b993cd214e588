//! In-process store implementing every discovery repository port.
//!
//! Used by the CLI when no database is configured, and by integration tests.
//! A single async mutex guards all state, so a reseed (flag check, wipe,
//! insert, flag set) or a snippet save with its item count update is atomic
//! with respect to every other operation on the same store.

mod collections;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    SeedingResult, SubCategoryRepository, SubCategoryRepositoryError, SubCategorySeedRepository,
    SubCategorySeedRepositoryError, SubCategorySeedRequest, UserSubCategoryPreferencesRepository,
    UserSubCategoryPreferencesRepositoryError,
};
use crate::domain::{
    CategoryId, Collection, FavouriteCategories, InitializationFlag, SavedSnippet, SubCategory,
    UserId, UserSubCategoryPreferences, Vote,
};

/// Write counters observed by tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounts {
    /// Number of collection wipes performed by reseeds.
    pub wipes: u64,
    /// Total records inserted by reseeds.
    pub inserted: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<SubCategory>,
    flag: Option<InitializationFlag>,
    preferences: HashMap<Uuid, UserSubCategoryPreferences>,
    collections: Vec<Collection>,
    snippets: Vec<SavedSnippet>,
    votes: Vec<Vote>,
    favourites: HashMap<Uuid, FavouriteCategories>,
}

/// In-memory discovery store.
#[derive(Debug, Default)]
pub struct InMemoryDiscoveryStore {
    state: Mutex<MemoryState>,
    wipes: AtomicU64,
    inserted: AtomicU64,
}

impl InMemoryDiscoveryStore {
    /// Create an empty, unseeded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for reseed writes since construction.
    pub fn write_counts(&self) -> WriteCounts {
        WriteCounts {
            wipes: self.wipes.load(Ordering::SeqCst),
            inserted: self.inserted.load(Ordering::SeqCst),
        }
    }

    /// Clear the initialisation flag, as an operator would to force a reseed.
    pub async fn reset_flag(&self) {
        let mut state = self.state.lock().await;
        state.flag = Some(InitializationFlag {
            initialized: false,
            last_updated: Utc::now(),
        });
    }

    /// Append records without touching the flag.
    pub async fn insert_records(&self, records: impl IntoIterator<Item = SubCategory>) {
        self.state.lock().await.records.extend(records);
    }

    /// Snapshot of every stored record in insertion order.
    pub async fn records(&self) -> Vec<SubCategory> {
        self.state.lock().await.records.clone()
    }
}

#[async_trait]
impl SubCategoryRepository for InMemoryDiscoveryStore {
    async fn list_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<SubCategory>, SubCategoryRepositoryError> {
        let state = self.state.lock().await;
        let mut matching: Vec<_> = state
            .records
            .iter()
            .filter(|record| record.parent_category == category)
            .cloned()
            .collect();
        matching.sort_by(SubCategory::pool_order);
        Ok(matching)
    }

    async fn list_all(&self) -> Result<Vec<SubCategory>, SubCategoryRepositoryError> {
        let mut records = self.state.lock().await.records.clone();
        records.sort_by(SubCategory::catalog_order);
        Ok(records)
    }
}

#[async_trait]
impl SubCategorySeedRepository for InMemoryDiscoveryStore {
    async fn load_flag(&self) -> Result<Option<InitializationFlag>, SubCategorySeedRepositoryError> {
        Ok(self.state.lock().await.flag)
    }

    async fn reseed(
        &self,
        request: SubCategorySeedRequest,
    ) -> Result<SeedingResult, SubCategorySeedRepositoryError> {
        let mut state = self.state.lock().await;
        if state.flag.is_some_and(|flag| flag.initialized) {
            return Ok(SeedingResult::AlreadySeeded);
        }

        let wiped = state.records.len();
        state.records.clear();
        self.wipes.fetch_add(1, Ordering::SeqCst);

        let count = request.records.len();
        state.records = request.records;
        self.inserted.fetch_add(count as u64, Ordering::SeqCst);
        state.flag = Some(InitializationFlag::initialized_at(request.initialized_at));

        debug!(wiped, inserted = count, "in-memory sub-categories reseeded");
        Ok(SeedingResult::Applied)
    }
}

#[async_trait]
impl UserSubCategoryPreferencesRepository for InMemoryDiscoveryStore {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserSubCategoryPreferences>, UserSubCategoryPreferencesRepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .preferences
            .get(user_id.as_uuid())
            .cloned())
    }

    async fn save(
        &self,
        preferences: &UserSubCategoryPreferences,
    ) -> Result<(), UserSubCategoryPreferencesRepositoryError> {
        self.state
            .lock()
            .await
            .preferences
            .insert(*preferences.user_id.as_uuid(), preferences.clone());
        Ok(())
    }
}
