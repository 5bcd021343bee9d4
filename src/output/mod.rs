//! Output module for crawl results
//!
//! This module handles:
//! - Writing the extracted link list
//! - Writing extracted item documents as markdown
//! - Summarising a run's statistics

mod markdown;
pub mod stats;

pub use markdown::{format_documents_markdown, write_documents_markdown};
pub use stats::{print_statistics, RunStatistics};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Creates `path` (and its parent directories) for writing
pub(crate) fn create_output_file(path: &Path) -> OutputResult<BufWriter<File>> {
    let wrap = |source: std::io::Error| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }

    File::create(path).map(BufWriter::new).map_err(wrap)
}

/// Writes links one per line, in the given order
pub fn write_links(links: &[String], path: &Path) -> OutputResult<()> {
    let mut file = create_output_file(path)?;
    let wrap = |source: std::io::Error| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    for link in links {
        writeln!(file, "{}", link).map_err(wrap)?;
    }
    file.flush().map_err(wrap)?;

    Ok(())
}
