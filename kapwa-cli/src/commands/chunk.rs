//! Chunk command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::OutputFormat;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use kapwa_core::{ChunkSet, Chunker, ChunkingConfig, CorpusStats, Encoding, Vocabulary};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Arguments for the chunk command
#[derive(Debug, Args)]
pub struct ChunkArgs {
    /// Input files, glob patterns or data-source directories
    #[arg(short, long, value_name = "FILE/PATTERN/DIR", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from config, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "KAPWA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum tokens per chunk
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<usize>,

    /// Token budget for sentences repeated between consecutive chunks
    #[arg(long, value_name = "N")]
    pub overlap_tokens: Option<usize>,

    /// BPE encoding used to count tokens
    #[arg(long, value_name = "NAME")]
    pub encoding: Option<Encoding>,

    /// Collapse paragraph breaks instead of splitting on them
    #[arg(long)]
    pub flatten_paragraphs: bool,

    /// Chunk files in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// What happened to one input file
enum FileOutcome {
    Chunked(ChunkSet),
    Skipped,
}

/// Totals printed after a run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Chunking totals over the documents that were read
    pub corpus: CorpusStats,
    /// Files skipped as unsupported, empty or unreadable
    pub skipped_files: usize,
}

impl ChunkArgs {
    /// Execute the chunk command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();

        log::info!("Starting chunking");
        log::debug!("Arguments: {:?}", self);

        let config = CliConfig::load(self.config.as_deref())?;
        let format = self.format.unwrap_or(config.output.default_format);
        let pretty_json = config.output.pretty_json;
        let chunking = self.chunking_config(config.chunking);

        let chunker = Chunker::with_config(chunking)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        if let Vocabulary::Unavailable { reason } = chunker.tokenizer().vocabulary() {
            log::warn!("Token counts are character estimates; the BPE vocabulary is unavailable: {reason}");
        }

        let files = resolve_patterns(&self.input)?;
        log::info!("Found {} input files", files.len());

        let summary = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                self.run(&chunker, &files, BufWriter::new(file), format, pretty_json)?
            }
            None => self.run(&chunker, &files, BufWriter::new(io::stdout()), format, pretty_json)?,
        };

        self.report(&summary, &chunker);
        Ok(())
    }

    /// Chunk every file and write the records through the chosen formatter
    pub fn run<W: Write + Send>(
        &self,
        chunker: &Chunker,
        files: &[PathBuf],
        writer: W,
        format: OutputFormat,
        pretty_json: bool,
    ) -> Result<RunSummary> {
        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        let process = |path: &PathBuf| {
            let outcome = chunk_file(chunker, path);
            progress.file_completed(&display_name(path));
            outcome
        };
        // Collecting keeps input order in both modes
        let outcomes: Vec<FileOutcome> = if self.parallel {
            files.par_iter().map(process).collect()
        } else {
            files.iter().map(process).collect()
        };
        progress.finish();

        let mut summary = RunSummary::default();
        let mut formatter = format.formatter(writer, pretty_json);
        for outcome in &outcomes {
            match outcome {
                FileOutcome::Chunked(set) => {
                    summary.corpus.record(set);
                    formatter
                        .write_set(set)
                        .map_err(|e| CliError::OutputError(e.to_string()))?;
                }
                FileOutcome::Skipped => summary.skipped_files += 1,
            }
        }
        formatter
            .finish()
            .map_err(|e| CliError::OutputError(e.to_string()))?;

        Ok(summary)
    }

    /// Apply command-line overrides on top of the file configuration
    pub fn chunking_config(&self, mut config: ChunkingConfig) -> ChunkingConfig {
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(overlap_tokens) = self.overlap_tokens {
            config.overlap_tokens = overlap_tokens;
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
        if self.flatten_paragraphs {
            config.preserve_paragraphs = false;
        }
        config
    }

    fn report(&self, summary: &RunSummary, chunker: &Chunker) {
        let corpus = &summary.corpus;
        log::info!(
            "Chunked {} documents into {} chunks ({} tokens, {} sentences dropped)",
            corpus.documents,
            corpus.chunks,
            corpus.total_tokens,
            corpus.dropped_sentences
        );
        if self.quiet {
            return;
        }

        eprintln!("Documents:      {}", corpus.documents);
        eprintln!(
            "Skipped:        {} files, {} without indexable text",
            summary.skipped_files, corpus.empty_documents
        );
        eprintln!("Chunks:         {}", corpus.chunks);
        eprintln!("Total tokens:   {}", corpus.total_tokens);
        eprintln!("Avg tokens:     {:.1}", corpus.avg_tokens());
        eprintln!("Tokenizer:      {}", chunker.tokenizer().mode());
        if corpus.dropped_sentences > 0 {
            eprintln!(
                "Dropped:        {} sentences longer than {} tokens",
                corpus.dropped_sentences,
                chunker.budget().max_tokens()
            );
        }
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // Already initialized when called more than once in-process
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }
}

fn chunk_file(chunker: &Chunker, path: &Path) -> FileOutcome {
    match FileReader::read_document(path) {
        Ok(Some(document)) => FileOutcome::Chunked(chunker.chunk_document(&document)),
        Ok(None) => FileOutcome::Skipped,
        Err(e) => {
            log::error!("{e:#}");
            FileOutcome::Skipped
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
