//! CloudFormation to Terraform converter CLI
//!
//! # Usage
//!
//! ```bash
//! # AWS credentials from the usual places (env, ~/.aws, SSO, instance role)
//! cfn2tf stacks/web.yaml out/
//!
//! # or a Bedrock API key
//! export AWS_BEARER_TOKEN_BEDROCK=...
//! cfn2tf stacks/web.yaml out/ --region eu-west-1 --model us.amazon.nova-lite-v1:0
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use colored::Colorize;

use cfn2tf::{BedrockAuth, Converter, ConverterConfig};
use cfn_llm::{InferenceConfig, DEFAULT_MODEL, DEFAULT_REGION};

#[derive(Parser)]
#[command(name = "cfn2tf")]
#[command(version = "0.1.0")]
#[command(about = "Convert a CloudFormation template to Terraform HCL using AWS Bedrock")]
#[command(long_about = None)]
struct Cli {
    /// CloudFormation template (YAML or JSON)
    source: PathBuf,

    /// Directory for the .tf file and CONVERSION_REPORT.md
    output_dir: PathBuf,

    /// AWS region of the Bedrock endpoint
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// Bedrock model or inference profile id
    #[arg(long, env = "BEDROCK_MODEL_ID", default_value = DEFAULT_MODEL)]
    model: String,

    /// Override the Bedrock Runtime endpoint URL
    #[arg(long, env = "BEDROCK_ENDPOINT_URL")]
    endpoint: Option<String>,
}

impl Cli {
    fn config(&self) -> ConverterConfig {
        ConverterConfig {
            region: self.region.clone(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            auth: BedrockAuth::from_env(),
            inference: InferenceConfig::default(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cfn2tf=info,cfn_llm=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => {
            println!("{} Converted {}", "✓".green(), cli.source.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let client = cli.config().llm_client().await;
    let converter = Converter::new(client);
    converter.convert(&cli.source, &cli.output_dir).await?;
    Ok(())
}
