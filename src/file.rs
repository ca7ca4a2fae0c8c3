use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

static HTML_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["html", "htm", "xhtml"].into_iter().collect());

/// An HTML input and its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file; `None` for stdin
    pub path: Option<PathBuf>,

    /// Path relative to the scanned root, used to lay out directory outputs
    pub relative_path: PathBuf,

    /// Raw HTML
    pub content: String,
}

impl SourceFile {
    /// Creates a source file read from disk.
    #[must_use]
    pub fn new(path: PathBuf, relative_path: PathBuf, content: String) -> Self {
        Self {
            path: Some(path),
            relative_path,
            content,
        }
    }

    /// Creates a source read from stdin.
    #[must_use]
    pub fn stdin(content: String) -> Self {
        Self {
            path: None,
            relative_path: PathBuf::from("stdin.html"),
            content,
        }
    }

    /// Returns a display label for logs.
    #[must_use]
    pub fn label(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
    }

    /// Returns the content size in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

/// Returns true if the path has an HTML extension (case-insensitive).
#[must_use]
pub(crate) fn has_html_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HTML_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
}

/// Reads a file as UTF-8.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub(crate) fn read_utf8(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| Error::invalid_utf8(path))
}

/// Reads all of `reader` as UTF-8.
///
/// # Errors
///
/// Returns an error if reading fails or the data is not valid UTF-8.
pub(crate) fn read_utf8_from(mut reader: impl Read, label: &Path) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(label, e))?;
    String::from_utf8(bytes).map_err(|_| Error::invalid_utf8(label))
}
