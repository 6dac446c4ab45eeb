//! Plain-text export of a finished document.
//!
//! Layout: title, introduction, then numbered sections, each block separated
//! by a blank line.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Document;

const MAX_FILE_STEM_CHARS: usize = 80;

/// Errors writing an exported document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The target file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Render the document as plain text.
pub fn render_plain_text(document: &Document) -> String {
    let mut out = format!("{}\n\n{}\n\n", document.title, document.introduction);
    for (number, section) in (1_usize..).zip(&document.sections) {
        // Writing into a String cannot fail.
        let _ = write!(out, "{number}. {}\n\n{}\n\n", section.title, section.content);
    }
    out
}

/// File name derived from the title, safe on common filesystems.
pub fn file_name(document: &Document) -> String {
    let stem: String = document
        .title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .take(MAX_FILE_STEM_CHARS)
        .collect();
    let stem = stem.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if stem.is_empty() {
        "article.txt".to_owned()
    } else {
        format!("{stem}.txt")
    }
}

/// Write the plain-text rendering into `dir`, returning the file path.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the directory or file cannot be written.
pub fn write_to_dir(dir: &Path, document: &Document) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name(document));
    fs::write(&path, render_plain_text(document)).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
