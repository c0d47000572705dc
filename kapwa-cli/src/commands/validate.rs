//! Validate command implementation

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use kapwa_core::SentenceSplitter;
use std::path::PathBuf;

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

        match self.check() {
            Ok(config) => {
                let chunking = &config.chunking;
                println!("✓ Configuration is valid!");
                println!("  Max tokens:     {}", chunking.max_tokens);
                println!("  Overlap tokens: {}", chunking.overlap_tokens);
                println!("  Encoding:       {}", chunking.encoding);
                println!("  Paragraphs:     {}", paragraph_mode(chunking.preserve_paragraphs));
                println!(
                    "  Abbreviations:  {} extra",
                    chunking.extra_abbreviations.len()
                );
                println!("  Output format:  {}", config.output.default_format);
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {e:#}"))
            }
        }
    }

    /// Parse the file and make sure a chunker could be built from it
    fn check(&self) -> Result<CliConfig> {
        let config = CliConfig::from_file(&self.config)?;
        SentenceSplitter::with_extra(&config.chunking.extra_abbreviations)?;
        Ok(config)
    }
}

fn paragraph_mode(preserve: bool) -> &'static str {
    if preserve {
        "preserved"
    } else {
        "flattened"
    }
}
