//! Catalog types and JSON parsing.
//!
//! The catalog groups authored sub-category entries under category keys. It
//! is loaded from JSON, validated once, and then exposed read-only.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::validation::{is_valid_category_key, validate_entries};

/// Current supported catalog version.
pub const SUPPORTED_VERSION: u32 = 1;

/// The catalog bundled with this crate.
pub const EMBEDDED_CATALOG_JSON: &str = include_str!("../data/subcategories.json");

/// A validated sub-category catalog.
///
/// # Example
///
/// ```
/// use subcategory_catalog::SubCategoryCatalog;
///
/// let catalog = SubCategoryCatalog::embedded().expect("bundled catalog is valid");
/// assert_eq!(catalog.version(), 1);
/// assert_eq!(catalog.categories().len(), 12);
/// assert_eq!(catalog.entry_count(), 180);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategoryCatalog {
    version: u32,
    categories: Vec<CategoryEntries>,
}

impl SubCategoryCatalog {
    /// Parses the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the bundled asset fails validation.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG_JSON)
    }

    /// Parses a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if:
    /// - The JSON is malformed or missing required fields
    /// - The version is unsupported
    /// - The category list is empty
    /// - A category key is invalid or repeated
    /// - A category is empty, has blank fields, or repeats a name
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog =
            serde_json::from_str(json).map_err(|e| CatalogError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawCatalog) -> Result<Self, CatalogError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.categories.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let mut keys = HashSet::new();
        let mut categories = Vec::with_capacity(raw.categories.len());
        for raw_category in raw.categories {
            let key = raw_category.category;
            if !is_valid_category_key(&key) {
                return Err(CatalogError::InvalidCategoryKey { category: key });
            }
            if !keys.insert(key.clone()) {
                return Err(CatalogError::DuplicateCategory { category: key });
            }

            validate_entries(
                &key,
                raw_category
                    .sub_categories
                    .iter()
                    .map(|e| (e.name.as_str(), e.description.as_str())),
            )?;

            let entries = raw_category
                .sub_categories
                .into_iter()
                .map(|e| CatalogEntry {
                    name: e.name,
                    description: e.description,
                })
                .collect();
            categories.push(CategoryEntries { key, entries });
        }

        Ok(Self {
            version: raw.version,
            categories,
        })
    }

    /// Returns the catalog version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the categories in authored order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryEntries] {
        &self.categories
    }

    /// Returns the total number of sub-category entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    /// Finds a category by key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CategoryNotFound`] if no category with the given
    /// key exists.
    pub fn find_category(&self, key: &str) -> Result<&CategoryEntries, CatalogError> {
        self.categories
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| CatalogError::CategoryNotFound {
                category: key.to_owned(),
            })
    }
}

/// The sub-categories authored for one category key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntries {
    key: String,
    entries: Vec<CatalogEntry>,
}

impl CategoryEntries {
    /// Returns the category key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the entries in authored order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

/// A single authored sub-category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    name: String,
    description: String,
}

impl CatalogEntry {
    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the short description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    version: u32,
    categories: Vec<RawCategory>,
}

/// Raw JSON representation of one category block.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCategory {
    category: String,
    sub_categories: Vec<RawEntry>,
}

/// Raw JSON representation of a sub-category entry.
#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    description: String,
}
