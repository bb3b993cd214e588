//! Discovery configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Configuration values for the discovery service.
///
/// Values come from `DISCOVERY_*` environment variables or a configuration
/// file; see the OrthoConfig documentation for precedence.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DISCOVERY")]
pub struct DiscoverySettings {
    /// PostgreSQL connection string. The in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Seed the sub-category catalog before serving requests. Defaults to on.
    pub seed_on_startup: Option<bool>,
    /// Optional catalog file used instead of the bundled catalog.
    pub catalog_path: Option<PathBuf>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Fixed seed for reproducible draws.
    pub random_seed: Option<u64>,
}

impl DiscoverySettings {
    /// Return the configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return whether startup seeding runs, enabled unless set to `false`.
    pub fn seed_on_startup(&self) -> bool {
        self.seed_on_startup.unwrap_or(true)
    }

    /// Return the configured pool size, falling back to the default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}
