//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Seeded sub-category reference records.
    sub_categories (id) {
        /// Primary key, regenerated on every reseed.
        id -> Uuid,
        /// Display name, unique within a category.
        name -> Text,
        /// Short description.
        description -> Text,
        /// Owning category storage key.
        parent_category -> Text,
        /// Insertion timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One-time initialisation guards keyed by resource.
    initialization_flags (key) {
        /// Guarded resource key.
        key -> Text,
        /// Whether the resource has been initialised.
        initialized -> Bool,
        /// Last write timestamp.
        last_updated -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user sub-category selections.
    user_sub_category_preferences (user_id) {
        /// Owning user.
        user_id -> Uuid,
        /// Category key to list of selected sub-category ids.
        selections -> Jsonb,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-owned collections.
    collections (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Display name.
        name -> Text,
        /// Icon name.
        icon -> Text,
        /// Number of saved snippets, never negative.
        item_count -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Snippets saved into collections.
    saved_snippets (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Holding collection; deleting it cascades.
        collection_id -> Uuid,
        /// Category storage key.
        category -> Text,
        /// Sub-category name at save time.
        sub_category -> Nullable<Text>,
        /// Generated text.
        content -> Text,
        /// Save timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Feed votes, one per user per snippet.
    snippet_votes (snippet_id, voter_id) {
        /// Voted snippet; deleting it cascades.
        snippet_id -> Uuid,
        /// Voting user.
        voter_id -> Uuid,
        /// `up` or `down`.
        kind -> Text,
        /// Last change timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Favourite categories per user.
    favourite_categories (user_id) {
        /// Owning user.
        user_id -> Uuid,
        /// Category storage keys in the order chosen.
        categories -> Array<Text>,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(saved_snippets -> collections (collection_id));
diesel::joinable!(snippet_votes -> saved_snippets (snippet_id));

diesel::allow_tables_to_appear_in_same_query!(
    sub_categories,
    initialization_flags,
    user_sub_category_preferences,
    collections,
    saved_snippets,
    snippet_votes,
    favourite_categories,
);
