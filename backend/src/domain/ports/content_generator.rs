//! Port for the external content-generation service.
//!
//! The generator receives human-readable labels, never identifiers: the
//! category display name and the chosen sub-category name.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by content generation adapters.
    pub enum ContentGeneratorError {
        /// The upstream service could not be reached.
        Unavailable { message: String } =>
            "content generator unavailable: {message}",
        /// The upstream service returned no usable content.
        EmptyResponse => "content generator returned no content",
    }
}

/// Labels passed to the content generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetRequest {
    /// Display name of the category, e.g. `Bilim`.
    pub category_name: String,
    /// Name of the resolved sub-category, e.g. `Fizik`.
    pub sub_category_name: String,
}

/// Port for generating a short informational snippet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate free text about the requested topic.
    async fn generate(&self, request: &SnippetRequest) -> Result<String, ContentGeneratorError>;
}

/// Fixture generator that echoes its inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContentGenerator;

#[async_trait]
impl ContentGenerator for FixtureContentGenerator {
    async fn generate(&self, request: &SnippetRequest) -> Result<String, ContentGeneratorError> {
        Ok(format!(
            "{} / {}",
            request.category_name, request.sub_category_name
        ))
    }
}
