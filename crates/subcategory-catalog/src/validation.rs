//! Structural validation for catalog categories and entries.
//!
//! # Validation Rules
//!
//! - Category keys are lowercase snake case (`[a-z][a-z0-9_]*`)
//! - Every category declares at least one sub-category
//! - Names and descriptions are not blank
//! - Names are unique within their category

use std::collections::HashSet;

use crate::error::CatalogError;

/// Validates a category key.
///
/// # Examples
///
/// ```
/// use subcategory_catalog::is_valid_category_key;
///
/// assert!(is_valid_category_key("data_science"));
/// assert!(!is_valid_category_key("Data Science"));
/// assert!(!is_valid_category_key("_hidden"));
/// assert!(!is_valid_category_key(""));
/// ```
#[must_use]
pub fn is_valid_category_key(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Checks a single category's entries against the validation rules.
pub(crate) fn validate_entries<'a, I>(category: &str, entries: I) -> Result<(), CatalogError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen = HashSet::new();

    for (index, (name, description)) in entries.into_iter().enumerate() {
        if name.trim().is_empty() {
            return Err(blank(category, index, "name"));
        }
        if description.trim().is_empty() {
            return Err(blank(category, index, "description"));
        }
        if !seen.insert(name) {
            return Err(CatalogError::DuplicateEntry {
                category: category.to_owned(),
                name: name.to_owned(),
            });
        }
    }

    if seen.is_empty() {
        return Err(CatalogError::EmptyCategory {
            category: category.to_owned(),
        });
    }
    Ok(())
}

fn blank(category: &str, index: usize, field: &'static str) -> CatalogError {
    CatalogError::BlankField {
        category: category.to_owned(),
        index,
        field,
    }
}
