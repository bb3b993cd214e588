//! Integration tests for `DieselUserSubCategoryPreferencesRepository` against
//! embedded PostgreSQL.

use backend::domain::ports::UserSubCategoryPreferencesRepository;
use backend::domain::{CategoryId, SubCategoryId, UserId, UserSubCategoryPreferences};
use backend::outbound::persistence::{
    DbPool, DieselUserSubCategoryPreferencesRepository, PoolConfig,
};
use chrono::{DateTime, TimeZone, Utc};
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::test_cluster;
use support::{handle_cluster_setup_failure, migrate_schema, reset_database};

const TEST_DB: &str = "diesel_sub_category_preferences_repo_test";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    repository: DieselUserSubCategoryPreferencesRepository,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    reset_database(&cluster, TEST_DB)?;
    let database_url = cluster.connection().database_url(TEST_DB);
    migrate_schema(&database_url)?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        repository: DieselUserSubCategoryPreferencesRepository::new(pool),
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[rstest]
fn preferences_round_trip(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: preferences_round_trip skipped");
        return;
    };

    let user_id = UserId::random();
    let physics = SubCategoryId::random();
    let chemistry = SubCategoryId::random();
    let preferences = UserSubCategoryPreferences::builder(user_id.clone())
        .select(CategoryId::Science, vec![physics, chemistry])
        .updated_at(at(8))
        .build();

    context
        .runtime
        .block_on(context.repository.save(&preferences))
        .expect("save preferences");

    let fetched = context
        .runtime
        .block_on(context.repository.find_by_user_id(&user_id))
        .expect("fetch preferences")
        .expect("preferences should exist");
    assert_eq!(fetched, preferences);
}

#[rstest]
fn second_save_replaces_the_first(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: second_save_replaces_the_first skipped");
        return;
    };

    let user_id = UserId::random();
    let first = UserSubCategoryPreferences::builder(user_id.clone())
        .select(CategoryId::Science, vec![SubCategoryId::random()])
        .updated_at(at(8))
        .build();
    let second = UserSubCategoryPreferences::builder(user_id.clone())
        .select(CategoryId::Art, vec![SubCategoryId::random()])
        .updated_at(at(9))
        .build();

    context
        .runtime
        .block_on(context.repository.save(&first))
        .expect("save first");
    context
        .runtime
        .block_on(context.repository.save(&second))
        .expect("save second");

    let fetched = context
        .runtime
        .block_on(context.repository.find_by_user_id(&user_id))
        .expect("fetch preferences")
        .expect("preferences should exist");
    assert_eq!(fetched, second);
    assert!(fetched.selections_for(CategoryId::Science).is_empty());
}

#[rstest]
fn unknown_user_has_no_preferences(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_user_has_no_preferences skipped");
        return;
    };

    let fetched = context
        .runtime
        .block_on(context.repository.find_by_user_id(&UserId::random()))
        .expect("lookup succeeds");
    assert!(fetched.is_none());
}
