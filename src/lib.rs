//! # html2asf
//!
//! Converts HTML, typically a notebook export, into Atlassian Storage Format
//! (ASF), the XHTML dialect Confluence stores pages in.
//!
//! ## Features
//!
//! - Permissive HTML parsing via `html5ever`
//! - A closed tag rule table with a lossy fallback for unknown markup
//! - Links and images rewritten into Confluence `ac:`/`ri:` macros
//! - Collection of referenced attachments and linked pages
//! - Single-file, directory and stdin conversion with atomic writes
//!
//! ## Quick Start
//!
//! ```
//! use html2asf::convert_html_str_to_asf;
//!
//! let asf = convert_html_str_to_asf(r#"<p><b>Note</b> <a href="Release Plan">plan</a></p>"#);
//! assert!(asf.starts_with("<p><strong>Note</strong> <ac:link>"));
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Scanner**: Reads the input file, directory tree or stdin
//! 2. **Parser**: Builds a [`Node`] tree from HTML
//! 3. **Transcoder**: Walks the tree post-order, applying per-tag rules
//! 4. **Writer**: Persists ASF output and a JSON summary

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod file;
mod node;
mod parser;
mod pipeline;
mod rules;
mod scanner;
mod title;
mod transcoder;
mod writer;

pub use config::{Config, ConfigBuilder, Sink, Source};
pub use error::{Error, Result};
pub use file::SourceFile;
pub use node::{Attributes, Element, Node};
pub use parser::parse_html;
pub use pipeline::{Document, Pipeline, PipelineReport, PipelineStats};
pub use title::{page_title, title_from_document, title_from_path};
pub use transcoder::{convert_document, convert_html_str_to_asf, html_to_asf, Context, Conversion};

/// Runs the complete conversion pipeline with the given configuration.
///
/// This is the main entry point for file-based conversion.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - An input doesn't exist, is unreadable or is not UTF-8
/// - A directory input holds no HTML files
/// - Output files cannot be written
///
/// # Examples
///
/// ```no_run
/// use html2asf::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .input_path("./exports")
///     .output_path("./storage")
///     .build()?;
///
/// let report = run(config)?;
/// println!("{} pages converted", report.stats.documents);
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<PipelineReport> {
    Pipeline::new(config)?.run()
}
