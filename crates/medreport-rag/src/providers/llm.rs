//! LLM provider trait for answer generation

use async_trait::async_trait;
use crate::error::Result;

/// Trait for the generative model: stateless single-turn text in, text out.
///
/// The model is expected, not guaranteed, to respect the grounding prompt;
/// the Citation Resolver never trusts its self-reported grounding.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a fully-assembled prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
