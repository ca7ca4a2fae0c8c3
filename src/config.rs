use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

const DEFAULT_EXTENSION: &str = "xml";

/// Where HTML input is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input
    Stdin,
    /// A single HTML file, or a directory scanned recursively
    Path(PathBuf),
}

impl Source {
    /// Interprets `-` as stdin and anything else as a path.
    #[must_use]
    pub fn from_arg(arg: impl Into<PathBuf>) -> Self {
        let path = arg.into();
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::Path(path)
        }
    }

    /// Returns the path for path sources.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Stdin => None,
            Self::Path(path) => Some(path),
        }
    }

    /// Returns true if the source is an existing directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.path().is_some_and(Path::is_dir)
    }
}

/// Where converted ASF output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    /// Returned to the caller for printing
    Stdout,
    /// A file for single inputs, a directory for directory inputs
    Path(PathBuf),
}

/// Configuration for the conversion pipeline.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Input to convert
    pub input: Source,

    /// Output destination
    pub output: Sink,

    /// Extension (without the dot) of files written into an output directory
    pub extension: String,

    /// Page title override; derived per document when absent
    pub title: Option<String>,

    /// Dry run mode (no file writes)
    pub dry_run: bool,

    /// Create backups of existing files
    pub backup_existing: bool,

    /// Write `summary.json` into directory outputs
    pub write_summary: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use html2asf::{Config, Source};
    ///
    /// let config = Config::builder()
    ///     .input(Source::Stdin)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input path doesn't exist
    /// - A directory input has no output directory
    /// - The output extension is empty or dotted
    pub fn validate(&self) -> Result<()> {
        if let Source::Path(ref path) = self.input {
            if !path.exists() {
                return Err(Error::config(format!(
                    "Input path does not exist: {}",
                    path.display()
                )));
            }
        }

        if self.input.is_dir() {
            match self.output {
                Sink::Stdout if !self.dry_run => {
                    return Err(Error::config(
                        "Directory input requires an output directory (or dry run)",
                    ));
                }
                Sink::Path(ref out) if out.is_file() => {
                    return Err(Error::config(format!(
                        "Output path for a directory input must be a directory: {}",
                        out.display()
                    )));
                }
                _ => {}
            }
        }

        if self.extension.is_empty() {
            return Err(Error::config("extension must not be empty"));
        }

        if self.extension.starts_with('.') {
            return Err(Error::config(format!(
                "extension must not start with a dot: {}",
                self.extension
            )));
        }

        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(Error::config("title must not be blank"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: Source::Stdin,
            output: Sink::Stdout,
            extension: DEFAULT_EXTENSION.to_string(),
            title: None,
            dry_run: false,
            backup_existing: true,
            write_summary: true,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    input: Option<Source>,
    output: Option<Sink>,
    extension: Option<String>,
    title: Option<String>,
    dry_run: bool,
    backup_existing: Option<bool>,
    write_summary: Option<bool>,
}

impl ConfigBuilder {
    /// Sets the input source.
    #[must_use]
    pub fn input(mut self, source: Source) -> Self {
        self.input = Some(source);
        self
    }

    /// Sets an input path (file or directory).
    #[must_use]
    pub fn input_path(self, path: impl Into<PathBuf>) -> Self {
        self.input(Source::Path(path.into()))
    }

    /// Sets the output sink.
    #[must_use]
    pub fn output(mut self, sink: Sink) -> Self {
        self.output = Some(sink);
        self
    }

    /// Sets an output path (file or directory).
    #[must_use]
    pub fn output_path(self, path: impl Into<PathBuf>) -> Self {
        self.output(Sink::Path(path.into()))
    }

    /// Sets the extension of files written into an output directory.
    #[must_use]
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }

    /// Overrides the derived page title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Enables or disables backup creation.
    #[must_use]
    pub fn backup_existing(mut self, enabled: bool) -> Self {
        self.backup_existing = Some(enabled);
        self
    }

    /// Enables or disables `summary.json` for directory outputs.
    #[must_use]
    pub fn write_summary(mut self, enabled: bool) -> Self {
        self.write_summary = Some(enabled);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            input: self.input.unwrap_or(Source::Stdin),
            output: self.output.unwrap_or(Sink::Stdout),
            extension: self
                .extension
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            title: self.title,
            dry_run: self.dry_run,
            backup_existing: self.backup_existing.unwrap_or(true),
            write_summary: self.write_summary.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
