//! Discovery flow: resolve a sub-category, then generate a snippet for it.
//!
//! Anonymous callers draw from the full pool. Known users have their stored
//! selections applied before the draw.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::ports::{
    ContentGenerator, ContentGeneratorError, SnippetRequest, SubCategoryRepository,
    UserSubCategoryPreferencesRepository, UserSubCategoryPreferencesRepositoryError,
};
use crate::domain::{
    CategoryId, SelectionError, SelectionResolver, SubCategory, UserId,
    UserSubCategoryPreferences,
};

/// Generated content for one resolved sub-category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Category the snippet belongs to.
    pub category: CategoryId,
    /// Sub-category the snippet was generated for.
    pub sub_category: SubCategory,
    /// Generated text.
    pub content: String,
}

/// Errors raised by [`DiscoveryService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// Loading the user's selections failed.
    #[error(transparent)]
    Preferences(#[from] UserSubCategoryPreferencesRepositoryError),
    /// No sub-category could be resolved.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// The content generator failed.
    #[error(transparent)]
    Generation(#[from] ContentGeneratorError),
}

/// Service that composes preference lookup, selection and generation.
pub struct DiscoveryService<P, S, G> {
    preferences_repo: Arc<P>,
    resolver: SelectionResolver<S>,
    generator: Arc<G>,
}

impl<P, S, G> DiscoveryService<P, S, G> {
    /// Create a new discovery service.
    pub fn new(preferences_repo: Arc<P>, resolver: SelectionResolver<S>, generator: Arc<G>) -> Self {
        Self {
            preferences_repo,
            resolver,
            generator,
        }
    }
}

impl<P, S, G> DiscoveryService<P, S, G>
where
    P: UserSubCategoryPreferencesRepository,
    S: SubCategoryRepository,
    G: ContentGenerator,
{
    /// Resolve a sub-category in `category` and generate a snippet for it.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the preference lookup, selection or
    /// generation fails.
    pub async fn discover(
        &self,
        user_id: Option<&UserId>,
        category: CategoryId,
    ) -> Result<Snippet, DiscoveryError> {
        let preferences = self.preferences_for(user_id).await?;
        let sub_category = self.resolver.resolve(category, &preferences).await?;
        self.generate(category, sub_category).await
    }

    /// Pick a random category and generate a snippet within it.
    ///
    /// # Errors
    ///
    /// See [`DiscoveryService::discover`].
    pub async fn discover_any(&self, user_id: Option<&UserId>) -> Result<Snippet, DiscoveryError> {
        let category = self.resolver.random_category();
        self.discover(user_id, category).await
    }

    async fn preferences_for(
        &self,
        user_id: Option<&UserId>,
    ) -> Result<UserSubCategoryPreferences, DiscoveryError> {
        let Some(user_id) = user_id else {
            return Ok(UserSubCategoryPreferences::empty(UserId::random()));
        };
        let stored = self.preferences_repo.find_by_user_id(user_id).await?;
        Ok(stored.unwrap_or_else(|| UserSubCategoryPreferences::empty(user_id.clone())))
    }

    async fn generate(
        &self,
        category: CategoryId,
        sub_category: SubCategory,
    ) -> Result<Snippet, DiscoveryError> {
        let request = SnippetRequest {
            category_name: category.display_name().to_owned(),
            sub_category_name: sub_category.name.clone(),
        };
        let content = self.generator.generate(&request).await.inspect_err(|error| {
            warn!(%category, sub_category = %sub_category.name, %error, "content generation failed");
        })?;
        debug!(%category, sub_category = %sub_category.name, "generated snippet");
        Ok(Snippet {
            category,
            sub_category,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the discovery flow.

    use super::*;
    use crate::domain::SubCategoryId;
    use crate::domain::ports::{
        FixedRandomSource, FixtureContentGenerator, FixtureSubCategoryRepository,
        FixtureUserSubCategoryPreferencesRepository, MockContentGenerator,
        MockUserSubCategoryPreferencesRepository,
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn records() -> Vec<SubCategory> {
        vec![
            SubCategory::new(CategoryId::Science, "Fizik", "Madde ve enerji"),
            SubCategory::new(CategoryId::Science, "Kimya", "Elementler"),
        ]
    }

    fn resolver(records: Vec<SubCategory>) -> SelectionResolver<FixtureSubCategoryRepository> {
        SelectionResolver::new(
            Arc::new(FixtureSubCategoryRepository::new(records)),
            Arc::new(FixedRandomSource::new(0.0)),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_discovery_skips_preference_lookup(records: Vec<SubCategory>) {
        let mut prefs = MockUserSubCategoryPreferencesRepository::new();
        prefs.expect_find_by_user_id().times(0);

        let service = DiscoveryService::new(
            Arc::new(prefs),
            resolver(records),
            Arc::new(FixtureContentGenerator),
        );
        let snippet = service
            .discover(None, CategoryId::Science)
            .await
            .expect("science is seeded");

        assert_eq!(snippet.category, CategoryId::Science);
        assert_eq!(snippet.sub_category.name, "Fizik");
        assert_eq!(snippet.content, "Bilim / Fizik");
    }

    #[rstest]
    #[tokio::test]
    async fn user_selections_are_applied(records: Vec<SubCategory>) {
        let user_id = UserId::random();
        let chemistry: SubCategoryId = records[1].id;
        let stored = UserSubCategoryPreferences::builder(user_id.clone())
            .select(CategoryId::Science, vec![chemistry])
            .build();

        let mut prefs = MockUserSubCategoryPreferencesRepository::new();
        prefs
            .expect_find_by_user_id()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .withf(|request| {
                request.category_name == "Bilim" && request.sub_category_name == "Kimya"
            })
            .times(1)
            .return_once(|_| Ok("Kimya hakkında".to_owned()));

        let service = DiscoveryService::new(Arc::new(prefs), resolver(records), Arc::new(generator));
        let snippet = service
            .discover(Some(&user_id), CategoryId::Science)
            .await
            .expect("selection resolves");
        assert_eq!(snippet.sub_category.id, chemistry);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_pool_surfaces_selection_error() {
        let service = DiscoveryService::new(
            Arc::new(FixtureUserSubCategoryPreferencesRepository),
            resolver(Vec::new()),
            Arc::new(FixtureContentGenerator),
        );
        let error = service
            .discover(None, CategoryId::Art)
            .await
            .expect_err("nothing seeded");
        assert_eq!(
            error,
            DiscoveryError::Selection(SelectionError::NoCandidates {
                category: CategoryId::Art
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn generator_failure_surfaces_generation_error(records: Vec<SubCategory>) {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .return_once(|_| Err(ContentGeneratorError::empty_response()));

        let service = DiscoveryService::new(
            Arc::new(FixtureUserSubCategoryPreferencesRepository),
            resolver(records),
            Arc::new(generator),
        );
        let error = service
            .discover(None, CategoryId::Science)
            .await
            .expect_err("generator fails");
        assert!(matches!(error, DiscoveryError::Generation(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn discover_any_uses_drawn_category(records: Vec<SubCategory>) {
        // A fixed draw of 0.0 always picks the first category.
        let mut all = records;
        all.push(SubCategory::new(CategoryId::Software, "Rust", "Sistem programlama"));

        let service = DiscoveryService::new(
            Arc::new(FixtureUserSubCategoryPreferencesRepository),
            resolver(all),
            Arc::new(FixtureContentGenerator),
        );
        let snippet = service.discover_any(None).await.expect("software is seeded");
        assert_eq!(snippet.category, CategoryId::Software);
        assert_eq!(snippet.content, "Yazılım / Rust");
    }
}
