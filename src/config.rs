//! Converter configuration
//!
//! Where the model lives, which one to call and how to authenticate.
//! Values come from CLI flags, which fall back to environment variables
//! (a `.env` file is honoured).

use std::fmt;
use std::sync::Arc;

use cfn_llm::{
    BedrockClient, BedrockSdkClient, InferenceConfig, LlmClient, API_KEY_ENV, DEFAULT_MODEL,
    DEFAULT_REGION,
};

/// Extension of the generated Terraform file
pub const TARGET_EXTENSION: &str = "tf";

/// How requests to Bedrock are authenticated
#[derive(Clone, PartialEq, Eq)]
pub enum BedrockAuth {
    /// Bedrock API key sent as a bearer token
    ApiKey(String),
    /// Standard AWS credential chain: env keys, profile, SSO, instance role
    CredentialChain,
}

impl BedrockAuth {
    /// API key when `AWS_BEARER_TOKEN_BEDROCK` is set, otherwise the chain
    pub fn from_env() -> Self {
        Self::from_api_key(std::env::var(API_KEY_ENV).ok())
    }

    fn from_api_key(api_key: Option<String>) -> Self {
        match api_key {
            Some(key) if !key.trim().is_empty() => BedrockAuth::ApiKey(key),
            _ => BedrockAuth::CredentialChain,
        }
    }
}

// Keeps the key out of logs and error output
impl fmt::Debug for BedrockAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BedrockAuth::ApiKey(_) => f.write_str("ApiKey(***)"),
            BedrockAuth::CredentialChain => f.write_str("CredentialChain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    /// AWS region, passed through unvalidated
    pub region: String,
    /// Bedrock model or inference profile id
    pub model: String,
    /// Endpoint override; the regional endpoint is used when unset
    pub endpoint: Option<String>,
    pub auth: BedrockAuth,
    pub inference: InferenceConfig,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: None,
            auth: BedrockAuth::CredentialChain,
            inference: InferenceConfig::default(),
        }
    }
}

impl ConverterConfig {
    /// Build the Bedrock client for the configured authentication mode
    pub async fn llm_client(&self) -> Arc<dyn LlmClient> {
        match &self.auth {
            BedrockAuth::ApiKey(api_key) => {
                tracing::debug!(region = %self.region, "Using Bedrock API key");
                Arc::new(self.configure(BedrockClient::new(api_key.clone(), &self.region)))
            }
            BedrockAuth::CredentialChain => {
                tracing::debug!(region = %self.region, "Using AWS credential chain");
                let client = BedrockSdkClient::from_env(&self.region, self.endpoint.as_deref())
                    .await
                    .with_model(&self.model)
                    .with_inference_config(self.inference);
                Arc::new(client)
            }
        }
    }

    fn configure(&self, client: BedrockClient) -> BedrockClient {
        let client = client
            .with_model(&self.model)
            .with_inference_config(self.inference);
        match &self.endpoint {
            Some(endpoint) => client.with_endpoint(endpoint),
            None => client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.model, "us.amazon.nova-pro-v1:0");
        assert!(config.endpoint.is_none());
        assert_eq!(config.auth, BedrockAuth::CredentialChain);
    }

    #[test]
    fn test_auth_prefers_api_key() {
        assert_eq!(
            BedrockAuth::from_api_key(Some("abc123".to_string())),
            BedrockAuth::ApiKey("abc123".to_string())
        );
    }

    #[test]
    fn test_auth_falls_back_to_credential_chain() {
        assert_eq!(BedrockAuth::from_api_key(None), BedrockAuth::CredentialChain);
        assert_eq!(
            BedrockAuth::from_api_key(Some("  ".to_string())),
            BedrockAuth::CredentialChain
        );
    }

    #[test]
    fn test_auth_debug_hides_key() {
        let auth = BedrockAuth::ApiKey("super-secret".to_string());
        assert_eq!(format!("{:?}", auth), "ApiKey(***)");
    }

    #[test]
    fn test_configure_applies_overrides() {
        let config = ConverterConfig {
            region: "ap-southeast-2".to_string(),
            model: "amazon.nova-lite-v1:0".to_string(),
            endpoint: Some("http://127.0.0.1:4566".to_string()),
            ..ConverterConfig::default()
        };
        let client = config.configure(BedrockClient::new("k".to_string(), &config.region));

        assert_eq!(client.model_name(), "amazon.nova-lite-v1:0");
        assert_eq!(client.endpoint(), "http://127.0.0.1:4566");
    }

    #[test]
    fn test_configure_keeps_regional_endpoint() {
        let config = ConverterConfig {
            region: "eu-central-1".to_string(),
            ..ConverterConfig::default()
        };
        let client = config.configure(BedrockClient::new("k".to_string(), &config.region));

        assert_eq!(
            client.endpoint(),
            "https://bedrock-runtime.eu-central-1.amazonaws.com"
        );
    }

    #[tokio::test]
    async fn test_api_key_client() {
        let config = ConverterConfig {
            model: "amazon.nova-lite-v1:0".to_string(),
            auth: BedrockAuth::ApiKey("k".to_string()),
            ..ConverterConfig::default()
        };
        let client = config.llm_client().await;

        assert_eq!(client.provider_name(), "AWS Bedrock");
        assert_eq!(client.model_name(), "amazon.nova-lite-v1:0");
    }

    #[tokio::test]
    async fn test_credential_chain_client() {
        let config = ConverterConfig {
            model: "amazon.nova-micro-v1:0".to_string(),
            endpoint: Some("http://127.0.0.1:4566".to_string()),
            ..ConverterConfig::default()
        };
        let client = config.llm_client().await;

        assert_eq!(client.provider_name(), "AWS Bedrock");
        assert_eq!(client.model_name(), "amazon.nova-micro-v1:0");
    }
}
