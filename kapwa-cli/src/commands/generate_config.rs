//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use kapwa_core::config::defaults;
use kapwa_core::Encoding;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite the file if it already exists
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, self.generate_template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the token budget and abbreviations for your corpus");
        println!("2. Validate your configuration:");
        println!("   kapwa validate --config {}", self.output.display());
        println!("3. Use it for chunking:");
        println!(
            "   kapwa chunk -i data/ --config {}",
            self.output.display()
        );

        Ok(())
    }

    /// Generate template configuration content
    fn generate_template(&self) -> String {
        let encodings: Vec<&str> = Encoding::ALL.iter().map(Encoding::name).collect();
        format!(
            r#"# Kapwa chunking configuration

[chunking]
# Largest chunk, in tokens of the chosen encoding
max_tokens = {max_tokens}

# Trailing sentences of a chunk repeated at the start of the next one,
# up to this many tokens. Must be smaller than max_tokens.
overlap_tokens = {overlap_tokens}

# One of: {encodings}
encoding = "{encoding}"

# Split sentences at blank lines. Set to false to collapse all whitespace.
preserve_paragraphs = {preserve}

# Abbreviations whose trailing period never ends a sentence, on top of the
# built-in English and Filipino table (Dr, Mr, Gng, Bb, Atty, ...)
extra_abbreviations = [
    # "Brgy",
    # "Kap",
]

[output]
# text, json, jsonl or markdown
default_format = "text"

# Indent JSON output
pretty_json = true
"#,
            max_tokens = defaults::MAX_TOKENS,
            overlap_tokens = defaults::OVERLAP_TOKENS,
            encodings = encodings.join(", "),
            encoding = Encoding::default(),
            preserve = defaults::PRESERVE_PARAGRAPHS,
        )
    }
}
