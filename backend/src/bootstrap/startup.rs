//! Startup seeding orchestration.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use mockable::DefaultClock;
use subcategory_catalog::SubCategoryCatalog;
use thiserror::Error;
use tracing::info;

use super::config::DiscoverySettings;
use crate::domain::ports::{SeedingResult, SubCategorySeedRepository};
use crate::domain::{SeedCatalog, SeedCatalogError, SeedOutcome, SeedingError, SubCategorySeeder};

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// The catalog override file could not be read.
    #[error("failed to read catalog at {path}: {source}")]
    CatalogRead {
        /// Path to the catalog file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The catalog failed to parse or does not cover every category.
    #[error("catalog error: {0}")]
    Catalog(#[from] SeedCatalogError),
    /// Persisting the catalog failed.
    #[error("sub-category seeding error: {0}")]
    Seeding(#[from] SeedingError),
}

/// Load the configured catalog, or the bundled one when no path is set.
///
/// # Errors
///
/// Returns [`StartupSeedingError`] when the file cannot be read or the
/// catalog is invalid.
pub fn load_catalog(settings: &DiscoverySettings) -> Result<SeedCatalog, StartupSeedingError> {
    let Some(path) = settings.catalog_path.as_deref() else {
        return Ok(SeedCatalog::embedded()?);
    };
    let contents = read_catalog_file(path)?;
    let catalog = SubCategoryCatalog::from_json(&contents).map_err(SeedCatalogError::from)?;
    Ok(SeedCatalog::try_from(&catalog)?)
}

/// Seed the sub-category catalog when enabled.
///
/// Returns `None` when seeding is disabled in `settings`.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use backend::bootstrap::{DiscoverySettings, seed_sub_categories_on_startup};
/// use backend::outbound::memory::InMemoryDiscoveryStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = DiscoverySettings {
///     database_url: None,
///     seed_on_startup: None,
///     catalog_path: None,
///     pool_max_size: None,
///     random_seed: None,
/// };
/// let store = Arc::new(InMemoryDiscoveryStore::new());
/// let outcome = seed_sub_categories_on_startup(&settings, store).await?;
/// assert!(outcome.is_some());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`StartupSeedingError`] when the catalog cannot be loaded or
/// persisted. The caller decides whether that is fatal.
pub async fn seed_sub_categories_on_startup<R>(
    settings: &DiscoverySettings,
    repository: Arc<R>,
) -> Result<Option<SeedOutcome>, StartupSeedingError>
where
    R: SubCategorySeedRepository,
{
    if !settings.seed_on_startup() {
        info!(reason = "disabled", "sub-category seeding skipped");
        return Ok(None);
    }

    let catalog = load_catalog(settings)?;
    let seeder = SubCategorySeeder::new(repository, Arc::new(DefaultClock));
    let outcome = seeder.ensure_seeded(&catalog).await?;

    match outcome.result {
        SeedingResult::Applied => {
            info!(inserted = outcome.inserted, "sub-category catalog seeded");
        }
        SeedingResult::AlreadySeeded => {
            info!("sub-category catalog already seeded; skipping");
        }
    }

    Ok(Some(outcome))
}

fn read_catalog_file(path: &Path) -> Result<String, StartupSeedingError> {
    let read_error = |source| StartupSeedingError::CatalogRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "catalog path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let payload = dir.read(Path::new(file_name)).map_err(read_error)?;
    String::from_utf8(payload)
        .map_err(|err| read_error(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}
