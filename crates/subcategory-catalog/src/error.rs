//! Error types for the sub-category catalog crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading, validating, or querying a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog file at '{path}': {message}")]
    IoError {
        /// Path to the catalog file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The catalog JSON is malformed or missing required fields.
    #[error("invalid catalog JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The catalog version is not supported.
    #[error("unsupported catalog version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the catalog.
        actual: u32,
    },

    /// The catalog contains no categories.
    #[error("catalog contains no categories")]
    EmptyCatalog,

    /// A category key is not lowercase snake case.
    #[error("invalid category key '{category}'")]
    InvalidCategoryKey {
        /// The rejected key.
        category: String,
    },

    /// The same category key appears more than once.
    #[error("category '{category}' is declared more than once")]
    DuplicateCategory {
        /// The repeated key.
        category: String,
    },

    /// A category declares no sub-categories.
    #[error("category '{category}' has no sub-categories")]
    EmptyCategory {
        /// The empty category key.
        category: String,
    },

    /// A sub-category name or description is blank.
    #[error("sub-category {index} in '{category}' has a blank {field}")]
    BlankField {
        /// Owning category key.
        category: String,
        /// Position of the entry within the category.
        index: usize,
        /// Name of the blank field.
        field: &'static str,
    },

    /// Two sub-categories in the same category share a name.
    #[error("sub-category '{name}' appears more than once in '{category}'")]
    DuplicateEntry {
        /// Owning category key.
        category: String,
        /// The repeated name.
        name: String,
    },

    /// The requested category key was not found in the catalog.
    #[error("category '{category}' not found in catalog")]
    CategoryNotFound {
        /// The key that was not found.
        category: String,
    },
}
