//! Startup wiring: configuration and catalog seeding.

mod config;
mod startup;

pub use config::DiscoverySettings;
pub use startup::{StartupSeedingError, load_catalog, seed_sub_categories_on_startup};
