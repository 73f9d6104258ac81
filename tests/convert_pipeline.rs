//! End-to-end conversion tests
//!
//! Runs the full pipeline against a stub LLM client so no network is
//! touched: template on disk in, .tf file and report out.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cfn2tf::{ConvertError, Converter, ParseError};
use cfn_llm::LlmClient;

const FENCED_REPLY: &str = "```hcl\nresource \"aws_instance\" \"web_server\" {\n  instance_type = \"t3.micro\"\n}\n```\n";
const STRIPPED_REPLY: &str = "resource \"aws_instance\" \"web_server\" {\n  instance_type = \"t3.micro\"\n}";

/// Returns a canned reply and records the prompt it was given
struct StubClient {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl StubClient {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for StubClient {
    async fn converse(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.reply.clone().map_err(|e| anyhow!(e))
    }

    fn model_name(&self) -> &str {
        "stub-model-v1"
    }

    fn provider_name(&self) -> &str {
        "Stub"
    }
}

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/web_stack.yaml")
}

#[tokio::test]
async fn test_convert_writes_sanitized_output_and_report() {
    let out = tempfile::tempdir().unwrap();
    let client = StubClient::replying(FENCED_REPLY);
    let converter = Converter::new(client.clone());

    let outcome = converter.convert(&fixture(), out.path()).await.unwrap();

    assert_eq!(outcome.output_file, out.path().join("web_stack.tf"));
    assert_eq!(outcome.report_file, out.path().join("CONVERSION_REPORT.md"));
    assert_eq!(outcome.terraform, STRIPPED_REPLY);

    let written = std::fs::read_to_string(&outcome.output_file).unwrap();
    assert_eq!(written, STRIPPED_REPLY);

    let original = std::fs::read_to_string(fixture()).unwrap();
    let report = std::fs::read_to_string(&outcome.report_file).unwrap();
    assert!(report.starts_with("# AI-Powered CloudFormation to Terraform Conversion\n"));
    assert!(report.contains(&format!("**File:** `{}`", fixture().display())));
    assert!(report.contains("**Converted:** Using Stub (stub-model-v1)"));
    assert!(report.contains(&format!("```hcl\n{}\n```", STRIPPED_REPLY)));
    assert!(report.contains(&format!("```yaml\n{}\n```\n", original)));

    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_prompt_contains_expanded_template() {
    let out = tempfile::tempdir().unwrap();
    let client = StubClient::replying("resource \"x\" {}");
    let converter = Converter::new(client.clone());

    converter.convert(&fixture(), out.path()).await.unwrap();

    let prompt = client.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.starts_with("Convert this CloudFormation template to Terraform HCL."));
    assert!(prompt.contains("\"Fn::FindInMap\": [\n"));
    assert!(prompt.contains("\"Ref\": \"AWS::Region\""));
    assert!(prompt.contains("\"Fn::GetAZs\": \"\""));
    assert!(prompt.contains("\"Fn::Base64\": \"#!/bin/bash\\nyum install -y httpd\\n\""));
    assert!(!prompt.contains("!GetAtt"));
}

#[tokio::test]
async fn test_creates_missing_output_directory() {
    let out = tempfile::tempdir().unwrap();
    let nested = out.path().join("converted").join("web");
    let converter = Converter::new(StubClient::replying("resource \"x\" {}"));

    let outcome = converter.convert(&fixture(), &nested).await.unwrap();

    assert!(nested.is_dir());
    assert_eq!(
        std::fs::read_to_string(outcome.output_file).unwrap(),
        "resource \"x\" {}"
    );
}

#[tokio::test]
async fn test_inference_failure_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let client = StubClient::failing("ThrottlingException: slow down");
    let converter = Converter::new(client.clone());

    let err = converter.convert(&fixture(), out.path()).await.unwrap_err();

    match &err {
        ConvertError::Inference {
            provider,
            model,
            source,
        } => {
            assert_eq!(provider, "Stub");
            assert_eq!(model, "stub-model-v1");
            assert!(source.to_string().contains("ThrottlingException"));
        }
        other => panic!("Expected Inference error, got {:?}", other),
    }
    assert_eq!(client.calls(), 1, "inference must not be retried");
    assert!(!out.path().join("web_stack.tf").exists());
    assert!(!out.path().join("CONVERSION_REPORT.md").exists());
}

#[tokio::test]
async fn test_unknown_tag_fails_before_inference() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bad.yaml");
    std::fs::write(
        &source,
        "Resources:\n  Fn:\n    Type: AWS::Lambda::Function\n    Properties:\n      Code: !Transform {Name: x}\n",
    )
    .unwrap();
    let client = StubClient::replying("unused");
    let converter = Converter::new(client.clone());

    let err = converter
        .convert(&source, &dir.path().join("out"))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            ConvertError::Parse(ParseError::UnknownTag { ref tag, .. }) if tag == "Transform"
        ),
        "got {:?}",
        err
    );
    assert_eq!(client.calls(), 0);
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn test_missing_source_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let client = StubClient::replying("unused");
    let converter = Converter::new(client.clone());

    let err = converter
        .convert(&dir.path().join("missing.yaml"), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::Io { .. }), "got {:?}", err);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_unfenced_reply_is_only_trimmed() {
    let out = tempfile::tempdir().unwrap();
    let converter = Converter::new(StubClient::replying("\n\ndata \"aws_caller_identity\" \"current\" {}\n\n"));

    let outcome = converter.convert(&fixture(), out.path()).await.unwrap();

    assert_eq!(outcome.terraform, "data \"aws_caller_identity\" \"current\" {}");
}
