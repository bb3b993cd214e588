//! Versioned sub-category reference catalog.
//!
//! This crate owns the hand-authored catalog of sub-categories that the
//! discovery backend seeds into its reference store. The catalog ships as an
//! embedded JSON asset so the seeding algorithm stays independent of the data
//! it writes, and alternative catalogs can be loaded from disk.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Loading the embedded catalog with [`SubCategoryCatalog::embedded`]
//! - Parsing catalogs from JSON strings or files
//! - Structural validation (version, category keys, blank fields, duplicate
//!   names within a category)
//!
//! Category keys are kept as strings here; the backend maps them onto its
//! closed category enumeration.
//!
//! # Example
//!
//! ```
//! use subcategory_catalog::SubCategoryCatalog;
//!
//! let json = r#"{
//!     "version": 1,
//!     "categories": [
//!         {
//!             "category": "science",
//!             "subCategories": [
//!                 {"name": "Fizik", "description": "Madde, enerji ve evrenin temel yasaları"}
//!             ]
//!         }
//!     ]
//! }"#;
//!
//! let catalog = SubCategoryCatalog::from_json(json).expect("valid catalog");
//! let science = catalog.find_category("science").expect("category exists");
//!
//! assert_eq!(science.entries().len(), 1);
//! assert_eq!(catalog.entry_count(), 1);
//! ```

mod catalog;
mod error;
mod validation;

pub use catalog::{
    CatalogEntry, CategoryEntries, EMBEDDED_CATALOG_JSON, SUPPORTED_VERSION, SubCategoryCatalog,
};
pub use error::CatalogError;
pub use validation::is_valid_category_key;
