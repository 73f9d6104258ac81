//! Markdown conversion report

/// File name of the report written next to the converted code
pub const REPORT_FILE_NAME: &str = "CONVERSION_REPORT.md";

/// Everything the report shows
#[derive(Debug, Clone)]
pub struct ConversionReport<'a> {
    /// Source path as the user gave it
    pub source_file: &'a str,
    pub provider: &'a str,
    pub model: &'a str,
    /// Sanitized model output
    pub terraform: &'a str,
    /// Source text exactly as read
    pub original_template: &'a str,
}

impl ConversionReport<'_> {
    pub fn render(&self) -> String {
        let mut report = String::new();

        report.push_str("# AI-Powered CloudFormation to Terraform Conversion\n\n");
        report.push_str(&format!(
            "## Source Template\n**File:** `{}`\n\n",
            self.source_file
        ));
        report.push_str(&format!(
            "**Converted:** Using {} ({})\n\n",
            self.provider, self.model
        ));

        report.push_str("---\n\n## Generated Terraform Code\n\n```hcl\n");
        report.push_str(self.terraform);
        report.push_str("\n```\n\n");

        report.push_str("---\n\n## Original CloudFormation Template\n\n```yaml\n");
        report.push_str(self.original_template);
        report.push_str("\n```\n");

        report
    }
}
