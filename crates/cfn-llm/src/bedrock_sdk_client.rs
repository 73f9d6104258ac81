//! Bedrock SDK Client
//!
//! Converse API client that signs requests with the standard AWS credential
//! chain: environment keys, shared profiles, SSO, container and instance
//! roles. Use this when no Bedrock API key is available.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, InferenceConfiguration, Message, StopReason,
};

use super::bedrock_client::{DEFAULT_MODEL, PROVIDER_NAME};
use super::inference::InferenceConfig;
use super::llm_client::LlmClient;

/// AWS Bedrock Runtime client backed by the AWS SDK
#[derive(Clone)]
pub struct BedrockSdkClient {
    client: aws_sdk_bedrockruntime::Client,
    model: String,
    inference: InferenceConfig,
}

impl BedrockSdkClient {
    /// Resolve credentials from the environment for the given region
    ///
    /// Credentials are looked up lazily, on the first request.
    pub async fn from_env(region: &str, endpoint: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        Self::from_sdk_config(&loader.load().await)
    }

    /// Build from an already loaded SDK configuration
    ///
    /// Retries are disabled: a conversion makes exactly one model call.
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        let conf = aws_sdk_bedrockruntime::config::Builder::from(config)
            .retry_config(RetryConfig::disabled())
            .build();
        Self {
            client: aws_sdk_bedrockruntime::Client::from_conf(conf),
            model: DEFAULT_MODEL.to_string(),
            inference: InferenceConfig::default(),
        }
    }

    /// Use a specific model
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Override the generation parameters
    pub fn with_inference_config(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    /// Internal API call implementation
    async fn call_api(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .converse()
            .model_id(&self.model)
            .messages(user_message(prompt)?)
            .inference_config(inference_configuration(&self.inference))
            .send()
            .await
            .map_err(|e| anyhow!("Bedrock API error: {}", DisplayErrorContext(&e)))?;

        if let Some(usage) = response.usage() {
            tracing::debug!(
                input_tokens = usage.input_tokens(),
                output_tokens = usage.output_tokens(),
                stop_reason = response.stop_reason().as_str(),
                "Bedrock converse completed"
            );
        }
        if *response.stop_reason() == StopReason::MaxTokens {
            tracing::warn!("Bedrock reply hit the max_tokens limit, output may be truncated");
        }

        reply_text(response.output())
    }
}

fn user_message(prompt: &str) -> Result<Message> {
    Ok(Message::builder()
        .role(ConversationRole::User)
        .content(ContentBlock::Text(prompt.to_string()))
        .build()?)
}

fn inference_configuration(inference: &InferenceConfig) -> InferenceConfiguration {
    InferenceConfiguration::builder()
        .max_tokens(i32::try_from(inference.max_tokens).unwrap_or(i32::MAX))
        .temperature(inference.temperature)
        .top_p(inference.top_p)
        .build()
}

/// Text of the first content block
fn reply_text(output: Option<&ConverseOutput>) -> Result<String> {
    output
        .and_then(|o| o.as_message().ok())
        .and_then(|m| m.content().first())
        .and_then(|c| c.as_text().ok())
        .cloned()
        .ok_or_else(|| anyhow!("Empty response from Bedrock"))
}

#[async_trait]
impl LlmClient for BedrockSdkClient {
    async fn converse(&self, prompt: &str) -> Result<String> {
        self.call_api(prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }
}
