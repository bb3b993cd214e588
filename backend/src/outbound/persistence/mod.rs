//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows and domain types,
//! using `diesel-async` over a `bb8` pool. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```rust,no_run
//! use backend::outbound::persistence::{
//!     DbPool, DieselSubCategoryRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/discovery";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let repo = DieselSubCategoryRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_collection_repository;
mod diesel_favourite_categories_repository;
mod diesel_sub_category_repository;
mod diesel_sub_category_seed_repository;
mod diesel_user_sub_category_preferences_repository;
mod diesel_vote_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_collection_repository::DieselCollectionRepository;
pub use diesel_favourite_categories_repository::DieselFavouriteCategoriesRepository;
pub use diesel_sub_category_repository::DieselSubCategoryRepository;
pub use diesel_sub_category_seed_repository::DieselSubCategorySeedRepository;
pub use diesel_user_sub_category_preferences_repository::DieselUserSubCategoryPreferencesRepository;
pub use diesel_vote_repository::DieselVoteRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
