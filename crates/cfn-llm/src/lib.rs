//! LLM inference client for template conversion
//!
//! This crate wraps the hosted model that performs the actual
//! CloudFormation to Terraform translation. It knows nothing about
//! templates, prompts or output files - callers hand it one prompt and
//! get one completion back.
//!
//! ## Provider
//!
//! AWS Bedrock Runtime, Converse API. Two clients share one contract:
//!
//! - [`BedrockClient`]: Bedrock API key (`AWS_BEARER_TOKEN_BEDROCK`) sent as
//!   a bearer token over reqwest
//! - [`BedrockSdkClient`]: the AWS SDK with the standard credential chain

pub mod bedrock_client;
pub mod bedrock_sdk_client;
pub mod inference;
pub mod llm_client;

// Re-exports for convenience
pub use bedrock_client::{BedrockClient, API_KEY_ENV, DEFAULT_MODEL, DEFAULT_REGION};
pub use bedrock_sdk_client::BedrockSdkClient;
pub use inference::InferenceConfig;
pub use llm_client::LlmClient;
