//! CloudFormation to Terraform conversion
//!
//! Loads a CloudFormation template (expanding short-hand intrinsic tags),
//! asks a hosted model to translate it, strips the code fence from the
//! reply and writes the result next to a Markdown report.
//!
//! ## Architecture
//!
//! ```text
//! template::TemplateLoader → prompt → cfn_llm::LlmClient → sanitize → files
//! ```
//!
//! The model client lives in the `cfn-llm` crate and is injected, so the
//! pipeline runs against a stub in tests.

pub mod config;
pub mod converter;
pub mod error;
pub mod prompt;
pub mod report;
pub mod sanitize;
pub mod template;

// Re-exports for convenience
pub use config::{BedrockAuth, ConverterConfig};
pub use converter::{ConversionOutcome, Converter};
pub use error::{ConvertError, Location, ParseError};
pub use sanitize::sanitize;
pub use template::{load_template, Document, IntrinsicTag, TemplateLoader};
