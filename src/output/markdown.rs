//! Markdown export of extracted item documents

use crate::crawler::ItemDocument;
use crate::output::{create_output_file, OutputError, OutputResult};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;

/// Writes extracted documents to a markdown file
///
/// # Arguments
///
/// * `documents` - Extracted documents, in crawl order
/// * `output_path` - Path where the markdown file should be written
pub fn write_documents_markdown(documents: &[ItemDocument], output_path: &Path) -> OutputResult<()> {
    let markdown = format_documents_markdown(documents, Utc::now());

    let mut file = create_output_file(output_path)?;
    file.write_all(markdown.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|source| OutputError::Write {
            path: output_path.display().to_string(),
            source,
        })?;

    Ok(())
}

/// Formats documents as markdown, one section per item
pub fn format_documents_markdown(documents: &[ItemDocument], generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();

    md.push_str("# Extracted Documents\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Documents**: {}\n\n", documents.len()));

    for document in documents {
        md.push_str(&format!("## Item {}\n\n", document.id));
        md.push_str(&format!("Source: <{}>\n\n", document.url));
        md.push_str(document.content.trim_end());
        md.push_str("\n\n");
    }

    md
}
