//! User collections, saved snippets and feed votes.
//!
//! A collection groups snippets a user chose to keep. Every saved snippet
//! belongs to exactly one collection of the same owner, and the collection's
//! `item_count` tracks how many snippets it holds. The feed lists every
//! user's saved snippets, newest first, with their net vote count.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{CategoryId, Snippet, UserId};

/// Icon assigned to a collection when none is chosen.
pub const DEFAULT_COLLECTION_ICON: &str = "FiFolder";

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id! {
    /// Identifier of a user collection.
    CollectionId
}

uuid_id! {
    /// Identifier of a saved snippet.
    SavedSnippetId
}

/// Validation errors for collection input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionValidationError {
    /// The collection name was blank.
    #[error("collection name must not be blank")]
    BlankName,
}

/// A named, user-owned group of saved snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Unique identifier.
    pub id: CollectionId,
    /// Owning user.
    pub owner: UserId,
    /// Display name.
    pub name: String,
    /// Icon name shown next to the collection.
    pub icon: String,
    /// Number of snippets currently saved in the collection.
    pub item_count: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Collection {
    /// Build an empty collection with a fresh identifier.
    ///
    /// The name is trimmed; a missing icon falls back to
    /// [`DEFAULT_COLLECTION_ICON`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use backend::domain::{Collection, UserId, DEFAULT_COLLECTION_ICON};
    /// # use chrono::Utc;
    /// let collection = Collection::new(UserId::random(), "  Okuma Listesi ", None, Utc::now())
    ///     .expect("valid name");
    ///
    /// assert_eq!(collection.name, "Okuma Listesi");
    /// assert_eq!(collection.icon, DEFAULT_COLLECTION_ICON);
    /// assert_eq!(collection.item_count, 0);
    /// ```
    pub fn new(
        owner: UserId,
        name: impl AsRef<str>,
        icon: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CollectionValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(CollectionValidationError::BlankName);
        }
        Ok(Self {
            id: CollectionId::random(),
            owner,
            name: name.to_owned(),
            icon: icon
                .filter(|icon| !icon.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COLLECTION_ICON.to_owned()),
            item_count: 0,
            created_at,
        })
    }
}

/// A snippet a user saved into one of their collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSnippet {
    /// Unique identifier.
    pub id: SavedSnippetId,
    /// Owning user.
    pub owner: UserId,
    /// Collection holding the snippet.
    pub collection_id: CollectionId,
    /// Category the content was generated for.
    pub category: CategoryId,
    /// Name of the sub-category the content was generated for.
    pub sub_category: Option<String>,
    /// Generated text.
    pub content: String,
    /// Save timestamp.
    pub created_at: DateTime<Utc>,
}

impl SavedSnippet {
    /// Capture a generated snippet for saving into `collection_id`.
    ///
    /// The sub-category is kept by name so the saved item survives reseeds.
    pub fn from_snippet(
        owner: UserId,
        collection_id: CollectionId,
        snippet: &Snippet,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SavedSnippetId::random(),
            owner,
            collection_id,
            category: snippet.category,
            sub_category: Some(snippet.sub_category.name.clone()),
            content: snippet.content.clone(),
            created_at,
        }
    }
}

/// Direction of a feed vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    /// Approve.
    Up,
    /// Disapprove.
    Down,
}

impl VoteKind {
    /// Storage key for the vote direction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown vote direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vote kind: {0}")]
pub struct ParseVoteKindError(pub String);

impl FromStr for VoteKind {
    type Err = ParseVoteKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(ParseVoteKindError(other.to_owned())),
        }
    }
}

/// One user's vote on one saved snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    /// Snippet voted on.
    pub snippet_id: SavedSnippetId,
    /// Voting user.
    pub voter: UserId,
    /// Vote direction.
    pub kind: VoteKind,
}

/// A saved snippet as shown in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// The saved snippet.
    pub snippet: SavedSnippet,
    /// Up votes minus down votes.
    pub vote_count: i64,
    /// The viewing user's own vote, if any.
    pub viewer_vote: Option<VoteKind>,
}

impl FeedItem {
    /// Tally `votes` for `snippet` from the point of view of `viewer`.
    ///
    /// Votes for other snippets are ignored.
    pub fn tally(snippet: SavedSnippet, votes: &[Vote], viewer: Option<&UserId>) -> Self {
        let mut vote_count = 0_i64;
        let mut viewer_vote = None;
        for vote in votes.iter().filter(|vote| vote.snippet_id == snippet.id) {
            vote_count += match vote.kind {
                VoteKind::Up => 1,
                VoteKind::Down => -1,
            };
            if viewer == Some(&vote.voter) {
                viewer_vote = Some(vote.kind);
            }
        }
        Self {
            snippet,
            vote_count,
            viewer_vote,
        }
    }
}
