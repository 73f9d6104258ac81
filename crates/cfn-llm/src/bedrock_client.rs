//! Bedrock Client
//!
//! LLM client implementation for the AWS Bedrock Runtime Converse API,
//! authenticated with a Bedrock API key sent as a bearer token. See
//! [`crate::bedrock_sdk_client`] for the AWS credential chain.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::inference::InferenceConfig;
use super::llm_client::LlmClient;

/// Default Bedrock model (Nova Pro, US cross-region inference profile)
pub const DEFAULT_MODEL: &str = "us.amazon.nova-pro-v1:0";

/// Default AWS region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Provider name shown in logs and the conversion report
pub const PROVIDER_NAME: &str = "AWS Bedrock";

/// Environment variable holding the Bedrock API key
pub const API_KEY_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

/// AWS Bedrock Runtime client
#[derive(Clone)]
pub struct BedrockClient {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
    model: String,
    inference: InferenceConfig,
}

impl BedrockClient {
    /// Create a new Bedrock client for the given region
    ///
    /// The region is not validated; it only shapes the endpoint host.
    pub fn new(api_key: String, region: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            endpoint: Self::regional_endpoint(region),
            model: DEFAULT_MODEL.to_string(),
            inference: InferenceConfig::default(),
        }
    }

    /// Create from environment variables
    pub fn from_env(region: &str) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| anyhow!("{} environment variable not set", API_KEY_ENV))?;
        Ok(Self::new(api_key, region))
    }

    /// Use a specific model
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Send requests to a custom endpoint (VPC endpoint, proxy, test server)
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Override the generation parameters
    pub fn with_inference_config(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    /// Public Bedrock Runtime endpoint for a region
    pub fn regional_endpoint(region: &str) -> String {
        format!("https://bedrock-runtime.{}.amazonaws.com", region)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{endpoint}/model/{model_id}/converse`
    fn converse_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid Bedrock endpoint '{}'", self.endpoint))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Bedrock endpoint '{}' cannot be a base URL", self.endpoint))?
            .pop_if_empty()
            .extend(["model", self.model.as_str(), "converse"]);
        Ok(url)
    }

    /// Internal API call implementation
    async fn call_api(&self, prompt: &str) -> Result<String> {
        let url = self.converse_url()?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "messages": [{
                    "role": "user",
                    "content": [{"text": prompt}]
                }],
                "inferenceConfig": &self.inference
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Bedrock API error {}: {}", status, body));
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            text: Option<String>,
        }
        #[derive(Deserialize)]
        struct Message {
            content: Vec<ContentBlock>,
        }
        #[derive(Deserialize)]
        struct Output {
            message: Option<Message>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Usage {
            input_tokens: u64,
            output_tokens: u64,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ApiResponse {
            output: Output,
            stop_reason: Option<String>,
            usage: Option<Usage>,
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .context("Failed to parse Bedrock response")?;

        if let Some(usage) = &api_response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = api_response.stop_reason.as_deref().unwrap_or("unknown"),
                "Bedrock converse completed"
            );
        }
        if api_response.stop_reason.as_deref() == Some("max_tokens") {
            tracing::warn!("Bedrock reply hit the max_tokens limit, output may be truncated");
        }

        api_response
            .output
            .message
            .and_then(|m| m.content.into_iter().next())
            .and_then(|c| c.text)
            .ok_or_else(|| anyhow!("Empty response from Bedrock"))
    }
}

#[async_trait]
impl LlmClient for BedrockClient {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client() {
        let client = BedrockClient::new("test-key".to_string(), DEFAULT_REGION);
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        assert_eq!(client.provider_name(), "AWS Bedrock");
        assert_eq!(
            client.endpoint(),
            "https://bedrock-runtime.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn test_region_passed_through() {
        let client = BedrockClient::new("test-key".to_string(), "eu-west-3");
        assert_eq!(
            client.endpoint(),
            "https://bedrock-runtime.eu-west-3.amazonaws.com"
        );
    }

    #[test]
    fn test_with_model() {
        let client = BedrockClient::new("test-key".to_string(), DEFAULT_REGION)
            .with_model("anthropic.claude-3-haiku-20240307-v1:0");
        assert_eq!(client.model_name(), "anthropic.claude-3-haiku-20240307-v1:0");
    }

    #[test]
    fn test_converse_url() {
        let client = BedrockClient::new("test-key".to_string(), DEFAULT_REGION)
            .with_endpoint("http://localhost:8080/");
        let url = client.converse_url().unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/model/us.amazon.nova-pro-v1:0/converse"
        );
    }

    #[test]
    fn test_converse_url_rejects_garbage_endpoint() {
        let client =
            BedrockClient::new("test-key".to_string(), DEFAULT_REGION).with_endpoint("not a url");
        assert!(client.converse_url().is_err());
    }
}
