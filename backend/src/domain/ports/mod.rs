//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the reference store, the preference store, collections and votes,
//! randomness, and content generation). Each trait exposes strongly typed errors so adapters map their
//! failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod collection_repository;
mod content_generator;
mod favourite_categories_repository;
mod random_source;
mod sub_category_repository;
mod sub_category_seed_repository;
mod user_sub_category_preferences_repository;
mod vote_repository;

#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{CollectionRepository, CollectionRepositoryError};
#[cfg(test)]
pub use content_generator::MockContentGenerator;
pub use content_generator::{
    ContentGenerator, ContentGeneratorError, FixtureContentGenerator, SnippetRequest,
};
#[cfg(test)]
pub use favourite_categories_repository::MockFavouriteCategoriesRepository;
pub use favourite_categories_repository::{
    FavouriteCategoriesRepository, FavouriteCategoriesRepositoryError,
};
#[cfg(test)]
pub use random_source::MockRandomSource;
pub use random_source::{FixedRandomSource, RandomSource};
#[cfg(test)]
pub use sub_category_repository::MockSubCategoryRepository;
pub use sub_category_repository::{
    FixtureSubCategoryRepository, SubCategoryRepository, SubCategoryRepositoryError,
};
#[cfg(test)]
pub use sub_category_seed_repository::MockSubCategorySeedRepository;
pub use sub_category_seed_repository::{
    FixtureSubCategorySeedRepository, SeedingResult, SubCategorySeedRepository,
    SubCategorySeedRepositoryError, SubCategorySeedRequest,
};
#[cfg(test)]
pub use user_sub_category_preferences_repository::MockUserSubCategoryPreferencesRepository;
pub use user_sub_category_preferences_repository::{
    FixtureUserSubCategoryPreferencesRepository, UserSubCategoryPreferencesRepository,
    UserSubCategoryPreferencesRepositoryError,
};
#[cfg(test)]
pub use vote_repository::MockVoteRepository;
pub use vote_repository::{VoteRepository, VoteRepositoryError};
