//! `discovery` command-line entry point.
//!
//! Seeds the sub-category catalog on startup, then lists, draws or updates
//! selections against PostgreSQL when `DISCOVERY_DATABASE_URL` is set, or
//! against an in-process store otherwise.

use std::ffi::OsString;
use std::sync::Arc;

use backend::bootstrap::{DiscoverySettings, load_catalog, seed_sub_categories_on_startup};
use backend::domain::ports::{
    RandomSource, SubCategoryRepository, SubCategorySeedRepository,
    UserSubCategoryPreferencesRepository,
};
use backend::domain::{
    CategoryId, SelectionResolver, SubCategory, SubCategoryId, SubCategoryPreferencesService,
    SubCategorySeeder, UserId, UserSubCategoryPreferences,
};
use backend::outbound::memory::InMemoryDiscoveryStore;
use backend::outbound::persistence::{
    DbPool, DieselSubCategoryRepository, DieselSubCategorySeedRepository,
    DieselUserSubCategoryPreferencesRepository, PoolConfig, run_pending_migrations,
};
use backend::outbound::random::{SeededRandomSource, ThreadRandomSource};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `discovery` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "discovery",
    about = "Seed and draw sub-categories for topic discovery",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Seed the catalog unless it is already initialised.
    Seed,
    /// List the fixed categories.
    Categories,
    /// List the seeded sub-categories of a category.
    List {
        /// Category storage key, e.g. `data_science`.
        #[arg(long)]
        category: CategoryId,
    },
    /// Draw one sub-category from a category.
    Draw {
        /// Category storage key.
        #[arg(long)]
        category: CategoryId,
        /// Apply this user's stored selections.
        #[arg(long, value_parser = parse_user_id)]
        user: Option<UserId>,
    },
    /// Draw a random category, then a sub-category within it.
    DrawAny {
        /// Apply this user's stored selections.
        #[arg(long, value_parser = parse_user_id)]
        user: Option<UserId>,
    },
    /// Replace a user's selection for one category. No ids clears it.
    Select {
        /// User whose selections change.
        #[arg(long, value_parser = parse_user_id)]
        user: UserId,
        /// Category storage key.
        #[arg(long)]
        category: CategoryId,
        /// Sub-category ids to allow.
        ids: Vec<SubCategoryId>,
    },
}

fn parse_user_id(value: &str) -> std::result::Result<UserId, String> {
    UserId::new(value).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = DiscoverySettings::load_from_iter([OsString::from("discovery")])
        .map_err(|err| eyre!("failed to load discovery settings: {err}"))?;

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build runtime")?;
    runtime.block_on(async_main(args.command, settings))
}

async fn async_main(command: Command, settings: DiscoverySettings) -> Result<()> {
    let random: Arc<dyn RandomSource> = match settings.random_seed {
        Some(seed) => Arc::new(SeededRandomSource::new(seed)),
        None => Arc::new(ThreadRandomSource),
    };

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply migrations")?;
        let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
            .await
            .wrap_err("failed to create database pool")?;
        let stores = Stores {
            sub_categories: Arc::new(DieselSubCategoryRepository::new(pool.clone())),
            seeds: Arc::new(DieselSubCategorySeedRepository::new(pool.clone())),
            preferences: Arc::new(DieselUserSubCategoryPreferencesRepository::new(pool)),
        };
        execute(command, &settings, stores, random).await
    } else {
        require_durable_store(&command, false)?;
        info!("no database configured; using in-memory store");
        let store = Arc::new(InMemoryDiscoveryStore::new());
        let stores = Stores {
            sub_categories: Arc::clone(&store),
            seeds: Arc::clone(&store),
            preferences: store,
        };
        execute(command, &settings, stores, random).await
    }
}

/// Refuse commands whose effect would be lost with a per-process store.
fn require_durable_store(command: &Command, durable: bool) -> Result<()> {
    if durable {
        return Ok(());
    }
    match command {
        Command::Select { .. } => Err(eyre!(
            "`select` needs DISCOVERY_DATABASE_URL; the in-memory store is discarded on exit"
        )),
        Command::List { .. } => {
            warn!("no database configured; listed ids are regenerated on every run");
            Ok(())
        }
        _ => Ok(()),
    }
}

struct Stores<S, D, P> {
    sub_categories: Arc<S>,
    seeds: Arc<D>,
    preferences: Arc<P>,
}

async fn execute<S, D, P>(
    command: Command,
    settings: &DiscoverySettings,
    stores: Stores<S, D, P>,
    random: Arc<dyn RandomSource>,
) -> Result<()>
where
    S: SubCategoryRepository,
    D: SubCategorySeedRepository,
    P: UserSubCategoryPreferencesRepository,
{
    if let Command::Seed = command {
        let catalog = load_catalog(settings).wrap_err("failed to load catalog")?;
        let seeder = SubCategorySeeder::new(stores.seeds, Arc::new(DefaultClock));
        let outcome = seeder
            .ensure_seeded(&catalog)
            .await
            .wrap_err("failed to seed sub-categories")?;
        println!("{:?}: {} records inserted", outcome.result, outcome.inserted);
        return Ok(());
    }

    if let Err(error) = seed_sub_categories_on_startup(settings, stores.seeds).await {
        warn!(%error, "startup seeding failed; continuing with the current catalog");
    }

    let resolver = SelectionResolver::new(Arc::clone(&stores.sub_categories), random);
    let preferences = SubCategoryPreferencesService::new(
        stores.preferences,
        Arc::clone(&stores.sub_categories),
        Arc::new(DefaultClock),
    );

    match command {
        Command::Seed => {}
        Command::Categories => {
            for category in CategoryId::ALL {
                println!(
                    "{}\t{}\t{}",
                    category,
                    category.display_name(),
                    category.description()
                );
            }
        }
        Command::List { category } => {
            let records = resolver
                .list_sub_categories(category)
                .await
                .wrap_err("failed to list sub-categories")?;
            for record in &records {
                print_record(record);
            }
        }
        Command::Draw { category, user } => {
            let prefs = load_preferences(&preferences, user).await?;
            let record = resolver
                .resolve(category, &prefs)
                .await
                .wrap_err("failed to draw a sub-category")?;
            print_record(&record);
        }
        Command::DrawAny { user } => {
            let prefs = load_preferences(&preferences, user).await?;
            let record = resolver
                .resolve_any(&prefs)
                .await
                .wrap_err("failed to draw a sub-category")?;
            print_record(&record);
        }
        Command::Select {
            user,
            category,
            ids,
        } => {
            let updated = preferences
                .update_category_selection(&user, category, ids)
                .await
                .wrap_err("failed to save selection")?;
            println!(
                "{}: {} selected in {}",
                updated.user_id,
                updated.selections_for(category).len(),
                category
            );
        }
    }
    Ok(())
}

async fn load_preferences<P, S>(
    service: &SubCategoryPreferencesService<P, S>,
    user: Option<UserId>,
) -> Result<UserSubCategoryPreferences>
where
    P: UserSubCategoryPreferencesRepository,
    S: SubCategoryRepository,
{
    match user {
        Some(user_id) => service
            .selections_for(&user_id)
            .await
            .wrap_err("failed to load user selections"),
        None => Ok(UserSubCategoryPreferences::empty(UserId::random())),
    }
}

fn print_record(record: &SubCategory) {
    println!(
        "{}\t{}\t{}\t{}",
        record.id, record.parent_category, record.name, record.description
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn select() -> Command {
        Command::Select {
            user: UserId::random(),
            category: CategoryId::Science,
            ids: Vec::new(),
        }
    }

    #[rstest]
    fn select_is_refused_without_a_database() {
        let error = require_durable_store(&select(), false).expect_err("select needs a database");
        assert!(error.to_string().contains("DISCOVERY_DATABASE_URL"));
    }

    #[rstest]
    fn select_runs_against_a_database() {
        assert!(require_durable_store(&select(), true).is_ok());
    }

    #[rstest]
    #[case::seed(Command::Seed)]
    #[case::list(Command::List { category: CategoryId::Art })]
    #[case::draw_any(Command::DrawAny { user: None })]
    fn read_commands_run_in_memory(#[case] command: Command) {
        assert!(require_durable_store(&command, false).is_ok());
    }

    #[rstest]
    fn cli_parses_select_arguments() {
        let id = SubCategoryId::random();
        let user = UserId::random();
        let args = CliArgs::try_parse_from([
            "discovery".to_owned(),
            "select".to_owned(),
            "--user".to_owned(),
            user.to_string(),
            "--category".to_owned(),
            "science".to_owned(),
            id.to_string(),
        ])
        .expect("arguments parse");
        assert!(matches!(
            args.command,
            Command::Select { category: CategoryId::Science, ref ids, .. } if ids == &[id]
        ));
    }
}
