//! Integration tests for preference updates feeding the discovery flow.

use std::collections::BTreeMap;
use std::sync::Arc;

use backend::domain::ports::{
    FixtureContentGenerator, RandomSource, SubCategoryRepository,
    UserSubCategoryPreferencesRepository,
};
use backend::domain::{
    CategoryId, DiscoveryError, DiscoveryService, PreferencesError, SeedCatalog, SelectionError,
    SelectionResolver, SubCategoryPreferencesService, SubCategorySeeder, UserId,
};
use backend::outbound::memory::InMemoryDiscoveryStore;
use backend::outbound::random::SeededRandomSource;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type Discovery =
    DiscoveryService<InMemoryDiscoveryStore, InMemoryDiscoveryStore, FixtureContentGenerator>;

#[fixture]
async fn seeded_store() -> Arc<InMemoryDiscoveryStore> {
    let store = Arc::new(InMemoryDiscoveryStore::new());
    let catalog = SeedCatalog::embedded().expect("bundled catalog is complete");
    SubCategorySeeder::new(Arc::clone(&store), Arc::new(DefaultClock))
        .ensure_seeded(&catalog)
        .await
        .expect("seeding succeeds");
    store
}

fn discovery(store: &Arc<InMemoryDiscoveryStore>) -> Discovery {
    let random: Arc<dyn RandomSource> = Arc::new(SeededRandomSource::new(5));
    DiscoveryService::new(
        Arc::clone(store),
        SelectionResolver::new(Arc::clone(store), random),
        Arc::new(FixtureContentGenerator),
    )
}

fn preferences(
    store: &Arc<InMemoryDiscoveryStore>,
) -> SubCategoryPreferencesService<InMemoryDiscoveryStore, InMemoryDiscoveryStore> {
    SubCategoryPreferencesService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::new(DefaultClock),
    )
}

#[rstest]
#[tokio::test]
async fn saved_selection_drives_discovery(#[future] seeded_store: Arc<InMemoryDiscoveryStore>) {
    let store = seeded_store.await;
    let user = UserId::random();
    let photography = store
        .list_by_category(CategoryId::Photography)
        .await
        .expect("pool");
    let chosen = photography.first().expect("seeded").clone();

    preferences(&store)
        .save_selections(
            &user,
            BTreeMap::from([(CategoryId::Photography, vec![chosen.id])]),
        )
        .await
        .expect("save succeeds");

    let snippet = discovery(&store)
        .discover(Some(&user), CategoryId::Photography)
        .await
        .expect("discovery succeeds");
    assert_eq!(snippet.sub_category, chosen);
    assert_eq!(snippet.content, format!("Fotoğrafçılık / {}", chosen.name));
}

#[rstest]
#[tokio::test]
async fn clearing_a_category_restores_the_full_pool(
    #[future] seeded_store: Arc<InMemoryDiscoveryStore>,
) {
    let store = seeded_store.await;
    let user = UserId::random();
    let service = preferences(&store);
    let pool = store
        .list_by_category(CategoryId::Business)
        .await
        .expect("pool");
    let first = pool.first().expect("seeded").id;

    service
        .update_category_selection(&user, CategoryId::Business, vec![first])
        .await
        .expect("restrict");
    service
        .update_category_selection(&user, CategoryId::Business, Vec::new())
        .await
        .expect("clear");

    let stored = store
        .find_by_user_id(&user)
        .await
        .expect("lookup")
        .expect("record exists");
    assert!(stored.is_unrestricted());

    let snippet = discovery(&store)
        .discover(Some(&user), CategoryId::Business)
        .await
        .expect("full pool is available");
    assert!(pool.contains(&snippet.sub_category));
}

#[rstest]
#[tokio::test]
async fn selection_outside_the_pool_is_not_saved(
    #[future] seeded_store: Arc<InMemoryDiscoveryStore>,
) {
    let store = seeded_store.await;
    let user = UserId::random();
    let art = store
        .list_by_category(CategoryId::Art)
        .await
        .expect("pool")
        .first()
        .expect("seeded")
        .id;

    let error = preferences(&store)
        .update_category_selection(&user, CategoryId::Science, vec![art])
        .await
        .expect_err("art id is rejected under science");
    assert!(matches!(error, PreferencesError::UnknownSubCategory { .. }));
    assert!(store.find_by_user_id(&user).await.expect("lookup").is_none());

    let snippet = discovery(&store)
        .discover(Some(&user), CategoryId::Science)
        .await
        .expect("science stays drawable");
    assert_eq!(snippet.sub_category.parent_category, CategoryId::Science);
}

#[rstest]
#[tokio::test]
async fn unknown_user_is_unrestricted(#[future] seeded_store: Arc<InMemoryDiscoveryStore>) {
    let store = seeded_store.await;
    let snippet = discovery(&store)
        .discover(Some(&UserId::random()), CategoryId::Psychology)
        .await
        .expect("discovery succeeds");
    assert_eq!(snippet.category, CategoryId::Psychology);
    assert_eq!(snippet.sub_category.parent_category, CategoryId::Psychology);
}

#[rstest]
#[tokio::test]
async fn discovery_without_seed_reports_no_candidates() {
    let store = Arc::new(InMemoryDiscoveryStore::new());
    let error = discovery(&store)
        .discover_any(None)
        .await
        .expect_err("nothing seeded");
    assert!(matches!(
        error,
        DiscoveryError::Selection(SelectionError::NoCandidates { .. })
    ));
}
