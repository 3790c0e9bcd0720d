use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

use buildlens::analysis::DataProcessor;
use buildlens::auth::Token;
use buildlens::config::AnalysisConfig;
use buildlens::models::BuildRecord;
use buildlens::providers::bitrise::{BitriseClient, DEFAULT_BASE_URL};
use buildlens::report::ReportGenerator;

#[derive(Parser)]
#[command(name = "buildlens")]
#[command(author, version, about = "Bitrise build history analyzer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the full build history from Bitrise
    Fetch {
        /// Bitrise personal access token
        #[arg(short, long, env = "BITRISE_ACCESS_TOKEN", hide_env_values = true)]
        token: String,

        /// File the raw builds are written to
        #[arg(short, long, default_value = "data.json")]
        output: PathBuf,

        /// Bitrise API base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Attempts per page before giving up
        #[arg(long, default_value_t = 3)]
        max_retries: u32,
    },

    /// Aggregate fetched builds into CSV, markdown and JSON reports
    Aggregate {
        /// Build data fetched with `fetch`
        #[arg(short, long, default_value = "data.json")]
        input: PathBuf,

        /// Directory the reports are written to
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Analysis configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Fetch {
                token,
                output,
                base_url,
                max_retries,
            } => {
                info!("Fetching builds from {base_url}");

                let client = BitriseClient::new(base_url, Token::from(token.as_str()))?
                    .with_retries(*max_retries, Duration::from_secs(1));
                let builds = client.fetch_all_builds().await?;

                let json_output = if self.pretty {
                    serde_json::to_string_pretty(&builds)?
                } else {
                    serde_json::to_string(&builds)?
                };

                std::fs::write(output, json_output)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                info!("{} builds written to: {}", builds.len(), output.display());

                Ok(())
            }
            Commands::Aggregate {
                input,
                output_dir,
                config,
            } => self.aggregate(input, output_dir, config.as_deref()),
        }
    }

    fn aggregate(&self, input: &Path, output_dir: &Path, config: Option<&Path>) -> Result<()> {
        let config = AnalysisConfig::load(config)?;

        let contents = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let builds: Vec<BuildRecord> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse builds from {}", input.display()))?;
        info!("Loaded {} builds from {}", builds.len(), input.display());

        let generator = ReportGenerator::new(&config).pretty(self.pretty);
        let data = DataProcessor::new(config).process(&builds)?;
        let written = generator.generate(&data, output_dir)?;

        for path in &written {
            info!("Report written to: {}", path.display());
        }

        Ok(())
    }
}
