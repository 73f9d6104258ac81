//! LLM Client Trait
//!
//! Interface the converter uses to reach the inference service.

use anyhow::Result;
use async_trait::async_trait;

/// Single-turn text completion interface
///
/// Implementations send one user-role message and return the model's raw
/// text reply. No retries happen at this level.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the prompt as a single user message, return raw text response
    async fn converse(&self, prompt: &str) -> Result<String>;

    /// Get the model identifier for logging and reports
    fn model_name(&self) -> &str;

    /// Get the provider name for logging and reports
    fn provider_name(&self) -> &str;
}
