use crate::{
    config::{Config, Sink},
    error::{Error, Result},
    pipeline::Document,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tracing::{debug, info};

/// Summary of written output files.
#[derive(Debug, Serialize)]
pub(crate) struct WriteSummary<'a> {
    /// Number of documents converted
    pub(crate) total_documents: usize,

    /// Distinct attachments referenced across all documents
    pub(crate) attachments: Vec<&'a str>,

    /// Distinct page titles linked across all documents
    pub(crate) page_links: Vec<&'a str>,

    /// Execution duration in seconds
    pub(crate) duration_secs: f64,

    /// Output directory path
    pub(crate) output_directory: String,

    /// Individual document summaries
    pub(crate) documents: Vec<DocumentSummary<'a>>,

    /// Generation timestamp
    pub(crate) generated_at: String,
}

/// Summary of a single converted document.
#[derive(Debug, Serialize)]
pub(crate) struct DocumentSummary<'a> {
    /// Input path, `None` for stdin
    pub(crate) source: Option<String>,

    /// Written output path
    pub(crate) output: Option<String>,

    /// Derived page title
    pub(crate) title: &'a str,

    /// Attachments this page references
    pub(crate) attachments: &'a [String],

    /// Pages this page links to
    pub(crate) page_links: &'a [String],
}

/// Places converted documents on disk with atomic writes.
pub(crate) struct Writer {
    output: Sink,
    extension: String,
    directory_input: bool,
    backup_existing: bool,
    write_summary: bool,
}

impl Writer {
    /// Creates a new writer from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            output: config.output.clone(),
            extension: config.extension.clone(),
            directory_input: config.input.is_dir(),
            backup_existing: config.backup_existing,
            write_summary: config.write_summary,
        }
    }

    /// Returns the target path for a document, or `None` for stdout.
    ///
    /// Directory inputs mirror their relative layout below the output
    /// directory. A single input written into an existing directory keeps
    /// its file stem.
    pub(crate) fn output_path(&self, relative: &Path) -> Option<PathBuf> {
        let Sink::Path(ref out) = self.output else {
            return None;
        };

        if self.directory_input {
            Some(out.join(relative).with_extension(&self.extension))
        } else if out.is_dir() {
            let name = relative.file_name().map_or_else(|| relative.into(), PathBuf::from);
            Some(out.join(name).with_extension(&self.extension))
        } else {
            Some(out.clone())
        }
    }

    /// Returns the summary directory, if a summary should be written.
    fn summary_dir(&self) -> Option<&Path> {
        match self.output {
            Sink::Path(ref out) if self.directory_input && self.write_summary => Some(out.as_path()),
            _ => None,
        }
    }

    /// Writes every document that has an output path.
    ///
    /// Nothing is written when two documents share an output path.
    ///
    /// # Errors
    ///
    /// Returns an error if output paths collide, a directory cannot be
    /// created or a write fails.
    pub(crate) fn write_documents(&self, documents: &[Document]) -> Result<usize> {
        check_collisions(documents)?;

        let mut written = 0;

        for doc in documents {
            let Some(ref path) = doc.output else {
                continue;
            };

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }

            self.write_file_atomic(path, &doc.conversion.body)?;
            written += 1;

            debug!(
                "Wrote '{}' ({} bytes) to {}",
                doc.title,
                doc.conversion.body.len(),
                path.display()
            );
        }

        if written > 0 {
            info!("Successfully wrote {} output files", written);
        }
        Ok(written)
    }

    /// Writes a file atomically with optional backup.
    ///
    /// # Process
    ///
    /// 1. Creates backup if file exists and backup is enabled
    /// 2. Writes content to temporary file
    /// 3. Syncs temporary file to disk
    /// 4. Atomically renames temporary file to target path
    fn write_file_atomic(&self, path: &Path, content: &str) -> Result<()> {
        if path.exists() && self.backup_existing {
            Self::backup_file(path)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

        drop(temp_file);

        fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

        Ok(())
    }

    /// Creates a timestamped backup of an existing file.
    fn backup_file(path: &Path) -> Result<()> {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)?
            .as_nanos();

        let filename = path
            .file_name()
            .ok_or_else(|| Error::config("Invalid file path"))?
            .to_string_lossy();

        let backup_path = path.with_file_name(format!("{filename}.backup.{timestamp}"));

        fs::copy(path, &backup_path).map_err(|e| Error::io(&backup_path, e))?;

        debug!("Created backup: {}", backup_path.display());
        Ok(())
    }

    /// Writes `summary.json` for directory outputs.
    ///
    /// Returns whether a summary was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary file cannot be written.
    pub(crate) fn write_summary(&self, documents: &[Document], duration: Duration) -> Result<bool> {
        let Some(dir) = self.summary_dir() else {
            return Ok(false);
        };

        let summary = WriteSummary {
            total_documents: documents.len(),
            attachments: distinct(documents.iter().flat_map(|d| &d.conversion.attachments)),
            page_links: distinct(documents.iter().flat_map(|d| &d.conversion.page_links)),
            duration_secs: duration.as_secs_f64(),
            output_directory: dir.display().to_string(),
            documents: documents
                .iter()
                .map(|d| DocumentSummary {
                    source: d.source.as_ref().map(|p| p.display().to_string()),
                    output: d.output.as_ref().map(|p| p.display().to_string()),
                    title: &d.title,
                    attachments: &d.conversion.attachments,
                    page_links: &d.conversion.page_links,
                })
                .collect(),
            generated_at: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        };

        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        let summary_path = dir.join("summary.json");
        let file = fs::File::create(&summary_path).map_err(|e| Error::io(&summary_path, e))?;

        serde_json::to_writer_pretty(file, &summary).map_err(Error::from)?;

        info!("Wrote summary to {}", summary_path.display());
        Ok(true)
    }
}

/// Fails when two documents would be written to the same path, as
/// `page.html` and `page.htm` do in a directory conversion.
fn check_collisions(documents: &[Document]) -> Result<()> {
    let mut seen: HashMap<&Path, &Document> = HashMap::new();
    let mut errors = Vec::new();

    for doc in documents {
        let Some(ref path) = doc.output else {
            continue;
        };

        if let Some(first) = seen.get(path.as_path()) {
            errors.push(Error::config(format!(
                "'{}' and '{}' both convert to '{}'",
                source_label(first),
                source_label(doc),
                path.display()
            )));
        } else {
            seen.insert(path.as_path(), doc);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::multiple(errors))
    }
}

fn source_label(doc: &Document) -> String {
    doc.source
        .as_ref()
        .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
}

/// Collects distinct values in first-seen order.
pub(crate) fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for value in values {
        if !out.contains(&value.as_str()) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcoder::Conversion;
    use assert_fs::prelude::*;

    fn document(output: Option<PathBuf>, body: &str) -> Document {
        Document {
            source: Some(PathBuf::from("page.html")),
            output,
            title: "Page".to_string(),
            conversion: Conversion {
                body: body.to_string(),
                attachments: vec!["a.png".to_string()],
                page_links: vec![],
            },
        }
    }

    fn writer(output: Sink, directory_input: bool) -> Writer {
        Writer {
            output,
            extension: "xml".to_string(),
            directory_input,
            backup_existing: true,
            write_summary: true,
        }
    }

    #[test]
    fn test_output_path_mirrors_directory_layout() {
        let w = writer(Sink::Path(PathBuf::from("out")), true);
        assert_eq!(
            w.output_path(Path::new("a/b.html")),
            Some(PathBuf::from("out/a/b.xml"))
        );
    }

    #[test]
    fn test_output_path_single_file() {
        let temp = assert_fs::TempDir::new().unwrap();

        let into_dir = writer(Sink::Path(temp.path().to_path_buf()), false);
        assert_eq!(
            into_dir.output_path(Path::new("notes.html")),
            Some(temp.path().join("notes.xml"))
        );

        let target = temp.path().join("exact.asf");
        let exact = writer(Sink::Path(target.clone()), false);
        assert_eq!(exact.output_path(Path::new("notes.html")), Some(target));

        assert_eq!(writer(Sink::Stdout, false).output_path(Path::new("x.html")), None);
    }

    #[test]
    fn test_write_creates_parents_and_backup() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("nested/page.xml");
        let w = writer(Sink::Path(temp.path().to_path_buf()), true);

        w.write_documents(&[document(Some(target.path().to_path_buf()), "one")])
            .unwrap();
        target.assert("one");

        w.write_documents(&[document(Some(target.path().to_path_buf()), "two")])
            .unwrap();
        target.assert("two");

        let backups = fs::read_dir(temp.child("nested").path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".backup."))
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_colliding_outputs_write_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("page.xml");
        let w = writer(Sink::Path(temp.path().to_path_buf()), true);

        let mut first = document(Some(target.path().to_path_buf()), "FIRST");
        first.source = Some(PathBuf::from("in/page.html"));
        let mut second = document(Some(target.path().to_path_buf()), "SECOND");
        second.source = Some(PathBuf::from("in/page.htm"));

        let err = w.write_documents(&[first, second]).unwrap_err();

        assert!(err.is_config());
        let message = err.to_string();
        assert!(message.contains("in/page.html"));
        assert!(message.contains("in/page.htm"));
        target.assert(predicates::path::missing());
    }

    #[test]
    fn test_write_summary_json() {
        let temp = assert_fs::TempDir::new().unwrap();
        let w = writer(Sink::Path(temp.path().to_path_buf()), true);

        let docs = vec![document(None, "x"), document(None, "y")];
        assert!(w.write_summary(&docs, Duration::from_millis(5)).unwrap());

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(temp.child("summary.json").path()).unwrap())
                .unwrap();
        assert_eq!(json["total_documents"], 2);
        assert_eq!(json["attachments"], serde_json::json!(["a.png"]));
    }

    #[test]
    fn test_no_summary_for_single_file() {
        let w = writer(Sink::Path(PathBuf::from("out.xml")), false);
        assert!(!w.write_summary(&[], Duration::ZERO).unwrap());
    }
}
