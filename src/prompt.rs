//! Conversion prompt
//!
//! The instruction text lives in `prompts/cfn_to_terraform.md`; the loaded
//! template is embedded as pretty-printed JSON.

use crate::error::ConvertError;
use crate::template::Document;

const CONVERSION_PROMPT: &str = include_str!("prompts/cfn_to_terraform.md");

const TEMPLATE_PLACEHOLDER: &str = "{template_json}";

/// Build the single user message sent to the model
pub fn build_conversion_prompt(document: &Document) -> Result<String, ConvertError> {
    let template_json = document.to_json_pretty()?;
    Ok(CONVERSION_PROMPT.replacen(TEMPLATE_PLACEHOLDER, &template_json, 1))
}
