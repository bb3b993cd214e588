//! Closed enumeration of discovery categories.
//!
//! Category identifiers are stored as lowercase snake-case strings in the
//! reference catalog and in user preferences. [`CategoryId`] is the only way
//! the domain refers to a category, so an unknown or misspelt key is rejected
//! at the edge instead of producing an empty pool.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the twelve fixed discovery categories.
///
/// # Examples
///
/// ```
/// # use backend::domain::CategoryId;
/// let category: CategoryId = "data_science".parse().expect("known category");
///
/// assert_eq!(category, CategoryId::DataScience);
/// assert_eq!(category.as_str(), "data_science");
/// assert_eq!(category.display_name(), "Veri Bilimi");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    /// Software engineering.
    Software,
    /// Technology and hardware.
    Technology,
    /// Natural sciences.
    Science,
    /// Fine and applied arts.
    Art,
    /// History.
    History,
    /// Philosophy.
    Philosophy,
    /// Psychology.
    Psychology,
    /// Geography.
    Geography,
    /// Photography.
    Photography,
    /// Data science.
    DataScience,
    /// Business.
    Business,
    /// Culture.
    Culture,
}

impl CategoryId {
    /// Every category, in catalog order.
    pub const ALL: [Self; 12] = [
        Self::Software,
        Self::Technology,
        Self::Science,
        Self::Art,
        Self::History,
        Self::Philosophy,
        Self::Psychology,
        Self::Geography,
        Self::Photography,
        Self::DataScience,
        Self::Business,
        Self::Culture,
    ];

    /// Returns the stable storage key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Software => "software",
            Self::Technology => "technology",
            Self::Science => "science",
            Self::Art => "art",
            Self::History => "history",
            Self::Philosophy => "philosophy",
            Self::Psychology => "psychology",
            Self::Geography => "geography",
            Self::Photography => "photography",
            Self::DataScience => "data_science",
            Self::Business => "business",
            Self::Culture => "culture",
        }
    }

    /// Returns the user-facing name, which is also the label sent to content
    /// generation.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Software => "Yazılım",
            Self::Technology => "Teknoloji",
            Self::Science => "Bilim",
            Self::Art => "Sanat",
            Self::History => "Tarih",
            Self::Philosophy => "Felsefe",
            Self::Psychology => "Psikoloji",
            Self::Geography => "Coğrafya",
            Self::Photography => "Fotoğrafçılık",
            Self::DataScience => "Veri Bilimi",
            Self::Business => "İş Dünyası",
            Self::Culture => "Kültür",
        }
    }

    /// Returns a one-line description of the category's scope.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Software => "Programlama, web geliştirme ve yazılım teknolojileri",
            Self::Technology => "Yeni teknolojiler ve dijital yenilikler",
            Self::Science => "Bilimsel keşifler ve araştırmalar",
            Self::Art => "Görsel sanatlar, müzik ve yaratıcılık",
            Self::History => "Dünya tarihi ve önemli olaylar",
            Self::Philosophy => "Düşünce sistemleri ve felsefi akımlar",
            Self::Psychology => "İnsan davranışları ve zihin bilimi",
            Self::Geography => "Dünya coğrafyası ve kültürler",
            Self::Photography => "Fotoğraf sanatı ve teknikleri",
            Self::DataScience => "Veri analizi ve yapay zeka",
            Self::Business => "Girişimcilik ve iş stratejileri",
            Self::Culture => "Dünya kültürleri ve gelenekler",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {input}")]
pub struct ParseCategoryIdError {
    /// The unrecognised input value.
    pub input: String,
}

impl FromStr for CategoryId {
    type Err = ParseCategoryIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ParseCategoryIdError {
                input: s.to_owned(),
            })
    }
}
