//! Input resolution: glob patterns and data-source directories

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve inputs to file paths
///
/// An input naming a directory contributes the files directly inside it
/// (no recursion); anything else is treated as a glob pattern.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);
        if as_path.is_dir() {
            files.extend(list_directory(as_path)?);
            continue;
        }

        let paths = glob(pattern).map_err(|_| CliError::InvalidPattern(pattern.clone()))?;
        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {pattern}"))?;

            if path.is_file() {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        return Err(CliError::NoInputFiles.into());
    }

    // Remove duplicates and sort
    files.sort();
    files.dedup();

    Ok(files)
}

fn list_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list directory: {}", dir.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    log::debug!("{} files in {}", files.len(), dir.display());
    Ok(files)
}
