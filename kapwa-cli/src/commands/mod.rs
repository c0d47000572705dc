//! CLI command implementations

use crate::output::OutputFormat;
use anyhow::Result;
use clap::Subcommand;
use kapwa_core::Encoding;

pub mod chunk;
pub mod generate_config;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split documents into token-bounded, overlapping chunks
    Chunk(chunk::ChunkArgs),

    /// Check a configuration file
    Validate(validate::ValidateArgs),

    /// Write a commented configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ListCommands {
    /// List available output formats
    Formats,

    /// List available token encodings
    Encodings,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Chunk(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => {
                for line in subcommand.lines() {
                    println!("{line}");
                }
                Ok(())
            }
        }
    }
}

impl ListCommands {
    /// Lines printed by `kapwa list`
    pub fn lines(&self) -> Vec<String> {
        match self {
            ListCommands::Formats => OutputFormat::ALL
                .iter()
                .map(|format| format!("{:<10} {}", format.name(), format.description()))
                .collect(),
            ListCommands::Encodings => Encoding::ALL
                .iter()
                .map(|encoding| {
                    let marker = if *encoding == Encoding::default() {
                        " (default)"
                    } else {
                        ""
                    };
                    format!("{}{marker}", encoding.name())
                })
                .collect(),
        }
    }
}
