//! Validate command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::CliConfig;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        match CliConfig::load(&self.config).and_then(|file| {
            let core = file.segmenter_config()?;
            Ok((file, core))
        }) {
            Ok((file, core)) => {
                println!("✓ Configuration is valid!");
                println!("  Strategy: {}", core.strategy);
                println!(
                    "  Chunk size: {}..{} bytes",
                    core.min_chunk_size, core.max_chunk_size
                );
                println!("  Output format: {}", file.output.format);
                println!("  Subject areas: {}", core.keywords.area_names().count());
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {e:#}"))
            }
        }
    }
}
