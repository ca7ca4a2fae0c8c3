use crate::{
    config::{Config, Source},
    error::{Error, Result},
    file::{has_html_extension, read_utf8, read_utf8_from, SourceFile},
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Discovers and reads HTML inputs.
pub(crate) struct Scanner {
    input: Source,
}

impl Scanner {
    /// Creates a new scanner from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            input: config.input.clone(),
        }
    }

    /// Reads every input named by the configured source.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A directory holds no HTML files
    /// - Any input cannot be read or is not UTF-8
    pub(crate) fn scan(&self) -> Result<Vec<SourceFile>> {
        match self.input {
            Source::Stdin => {
                let content = read_utf8_from(std::io::stdin().lock(), Path::new("<stdin>"))?;
                Ok(vec![SourceFile::stdin(content)])
            }
            Source::Path(ref path) if path.is_dir() => Self::scan_dir(path),
            Source::Path(ref path) => {
                let relative = path.file_name().map_or_else(|| path.clone(), PathBuf::from);
                Ok(vec![SourceFile::new(path.clone(), relative, read_utf8(path)?)])
            }
        }
    }

    fn scan_dir(root: &Path) -> Result<Vec<SourceFile>> {
        debug!("Scanning {} for HTML files", root.display());

        let mut paths = Vec::new();
        let mut errors = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            match entry {
                Ok(entry) if entry.file_type().is_file() && has_html_extension(entry.path()) => {
                    paths.push(entry.into_path());
                }
                Ok(entry) => trace!("Skipping {}", entry.path().display()),
                Err(e) => {
                    warn!("Failed to walk entry: {}", e);
                    let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    errors.push(Error::io(path, e.into()));
                }
            }
        }

        if !errors.is_empty() {
            return Err(Error::multiple(errors));
        }

        if paths.is_empty() {
            return Err(Error::no_files(root));
        }

        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let relative = pathdiff::diff_paths(&path, root).unwrap_or_else(|| path.clone());
                let content = read_utf8(&path)?;
                Ok(SourceFile::new(path, relative, content))
            })
            .collect()
    }
}
