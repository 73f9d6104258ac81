//! Generation parameters sent with every request.

use serde::{Deserialize, Serialize};

/// Fixed generation parameters for a conversion request
///
/// Serialized with the Converse API's camelCase field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature (kept low for near-deterministic output)
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.1,
            top_p: 0.9,
        }
    }
}
