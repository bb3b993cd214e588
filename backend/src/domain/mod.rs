//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities used by the discovery flow
//! and the services that orchestrate seeding, selection and preference
//! updates through the ports in [`ports`].
//!
//! Public surface:
//! - `CategoryId`: closed enumeration of discovery categories.
//! - `SubCategory`: one seeded sub-category record.
//! - `UserSubCategoryPreferences`: per-user category restrictions.
//! - `SubCategorySeeder`: one-time catalog seeding guarded by a flag.
//! - `SelectionResolver`: uniform draw from the effective pool.
//! - `DiscoveryService`: selection followed by content generation.
//! - `SubCategoryPreferencesService`: read and write user selections.
//! - `CollectionService`: user collections and the snippets saved in them.
//! - `FeedService`: every user's saved snippets with up/down votes.
//! - `FavouriteCategoriesService`: per-user favourite categories.

pub mod category;
pub mod collection_service;
pub mod collections;
pub mod discovery;
pub mod favourites;
pub mod initialization;
pub mod ports;
pub mod preferences;
pub mod preferences_service;
pub mod seeding;
pub mod selection;
pub mod sub_category;
pub mod user;

pub use self::category::{CategoryId, ParseCategoryIdError};
pub use self::collection_service::{CollectionError, CollectionService, FeedService};
pub use self::collections::{
    Collection, CollectionId, CollectionValidationError, DEFAULT_COLLECTION_ICON, FeedItem,
    ParseVoteKindError, SavedSnippet, SavedSnippetId, Vote, VoteKind,
};
pub use self::discovery::{DiscoveryError, DiscoveryService, Snippet};
pub use self::favourites::{FavouriteCategories, FavouriteCategoriesService};
pub use self::initialization::{InitializationFlag, SUB_CATEGORIES_FLAG_KEY};
pub use self::preferences::{
    SubCategorySelections, UserSubCategoryPreferences, UserSubCategoryPreferencesBuilder,
};
pub use self::preferences_service::{PreferencesError, SubCategoryPreferencesService};
pub use self::seeding::{
    SeedCatalog, SeedCatalogError, SeedEntry, SeedOutcome, SeedingError, SubCategorySeeder,
};
pub use self::selection::{SelectionError, SelectionResolver, effective_pool, index_from_unit};
pub use self::sub_category::{SubCategory, SubCategoryId};
pub use self::user::{UserId, UserValidationError};
