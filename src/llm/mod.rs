//! Content generation abstraction and implementations.
//!
//! The generator is a stateless collaborator: prompt text in, generated text
//! out. Failures surface through the LLM error taxonomy so callers can relay
//! quota and availability problems to the user unmodified.

pub mod gemini;

use crate::error::Error;

/// Common trait for content generators
#[async_trait::async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate text from a prompt
    async fn generate(&self, prompt: &str) -> Result<String, Error>;

    /// Get the generator name (e.g., "gemini")
    fn name(&self) -> &str;
}
