//! Conversion pipeline
//!
//! ```text
//! source file → TemplateLoader → prompt → LlmClient → sanitize → .tf + report
//! ```
//!
//! One model call per run, no retries. Output files are only written once
//! the model has answered.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cfn_llm::LlmClient;
use tracing::{error, info};

use crate::config::TARGET_EXTENSION;
use crate::error::ConvertError;
use crate::prompt::build_conversion_prompt;
use crate::report::{ConversionReport, REPORT_FILE_NAME};
use crate::sanitize::sanitize;
use crate::template::TemplateLoader;

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub output_file: PathBuf,
    pub report_file: PathBuf,
    /// Sanitized Terraform code, as written to `output_file`
    pub terraform: String,
}

/// Converts CloudFormation templates using an injected LLM client
pub struct Converter {
    client: Arc<dyn LlmClient>,
    loader: TemplateLoader,
}

impl Converter {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            loader: TemplateLoader::new(),
        }
    }

    /// Convert `source` and write `<stem>.tf` plus the report into `output_dir`
    pub async fn convert(
        &self,
        source: &Path,
        output_dir: &Path,
    ) -> Result<ConversionOutcome, ConvertError> {
        let original_template =
            std::fs::read_to_string(source).map_err(|e| ConvertError::io(source, e))?;

        let document = self.loader.load(&original_template)?;
        info!(
            "Loaded {} ({} resources)",
            source.display(),
            document.resource_count()
        );

        let prompt = build_conversion_prompt(&document)?;

        std::fs::create_dir_all(output_dir).map_err(|e| ConvertError::io(output_dir, e))?;

        info!(
            "Calling {} to convert {}...",
            self.client.provider_name(),
            source.display()
        );
        let reply = match self.client.converse(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("{} error: {:#}", self.client.provider_name(), e);
                return Err(ConvertError::Inference {
                    provider: self.client.provider_name().to_string(),
                    model: self.client.model_name().to_string(),
                    source: e,
                });
            }
        };
        let terraform = sanitize(&reply);

        let output_file = output_dir.join(output_file_name(source));
        std::fs::write(&output_file, &terraform).map_err(|e| ConvertError::io(&output_file, e))?;

        let source_label = source.display().to_string();
        let report = ConversionReport {
            source_file: &source_label,
            provider: self.client.provider_name(),
            model: self.client.model_name(),
            terraform: &terraform,
            original_template: &original_template,
        };
        let report_file = output_dir.join(REPORT_FILE_NAME);
        std::fs::write(&report_file, report.render())
            .map_err(|e| ConvertError::io(&report_file, e))?;

        info!("Converted {} → {}", source.display(), output_file.display());

        Ok(ConversionOutcome {
            output_file,
            report_file,
            terraform,
        })
    }
}

/// `<source stem>.tf`
fn output_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    format!("{}.{}", stem, TARGET_EXTENSION)
}
