use crate::{
    config::Config,
    error::Result,
    file::SourceFile,
    parser::parse_html,
    scanner::Scanner,
    title::page_title,
    transcoder::{content_root, html_to_asf, Context, Conversion},
    writer::{distinct, Writer},
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// A converted document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Input path, `None` for stdin
    pub source: Option<PathBuf>,

    /// Target path, `None` when the output goes to stdout or in dry runs
    pub output: Option<PathBuf>,

    /// Page title for the Confluence page
    pub title: String,

    /// Converted body and collected references
    pub conversion: Conversion,
}

/// Statistics collected during pipeline execution.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    /// Number of documents converted
    pub documents: usize,

    /// Total HTML bytes read
    pub input_bytes: usize,

    /// Total ASF bytes produced
    pub output_bytes: usize,

    /// Number of files written, including `summary.json`
    pub files_written: usize,

    /// Distinct attachments referenced across all documents
    pub attachments: usize,

    /// Distinct page titles linked across all documents
    pub page_links: usize,

    /// Total execution time
    pub duration: Duration,

    /// Time spent reading inputs
    pub scan_duration: Duration,

    /// Time spent converting
    pub convert_duration: Duration,

    /// Time spent writing
    pub write_duration: Duration,
}

impl PipelineStats {
    /// Creates statistics from converted documents and stage timings.
    #[must_use]
    pub fn new(
        documents: &[Document],
        input_bytes: usize,
        files_written: usize,
        duration: Duration,
        scan_duration: Duration,
        convert_duration: Duration,
        write_duration: Duration,
    ) -> Self {
        Self {
            documents: documents.len(),
            input_bytes,
            output_bytes: documents.iter().map(|d| d.conversion.body.len()).sum(),
            files_written,
            attachments: distinct(documents.iter().flat_map(|d| &d.conversion.attachments)).len(),
            page_links: distinct(documents.iter().flat_map(|d| &d.conversion.page_links)).len(),
            duration,
            scan_duration,
            convert_duration,
            write_duration,
        }
    }

    /// Prints a human-readable summary to stderr.
    pub fn print_summary(&self) {
        eprintln!("\n╔═══════════════════════════════════════════════════════╗");
        eprintln!("║            Conversion Summary                         ║");
        eprintln!("╠═══════════════════════════════════════════════════════╣");
        eprintln!("║ Documents:            {:>8}                        ║", self.documents);
        eprintln!("║ HTML bytes read:      {:>8}                        ║", self.input_bytes);
        eprintln!("║ ASF bytes produced:   {:>8}                        ║", self.output_bytes);
        eprintln!("║ Files written:        {:>8}                        ║", self.files_written);
        eprintln!("║                                                       ║");
        eprintln!("║ Attachments to upload:{:>8}                        ║", self.attachments);
        eprintln!("║ Linked pages:         {:>8}                        ║", self.page_links);
        eprintln!("║                                                       ║");
        eprintln!("║ Timing Breakdown:                                     ║");
        eprintln!(
            "║   - Reading:          {:>8.2}s                     ║",
            self.scan_duration.as_secs_f64()
        );
        eprintln!(
            "║   - Converting:       {:>8.2}s                     ║",
            self.convert_duration.as_secs_f64()
        );
        eprintln!(
            "║   - Writing:          {:>8.2}s                     ║",
            self.write_duration.as_secs_f64()
        );
        eprintln!(
            "║   - Total:            {:>8.2}s                     ║",
            self.duration.as_secs_f64()
        );
        eprintln!("╚═══════════════════════════════════════════════════════╝\n");
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Execution statistics
    pub stats: PipelineStats,

    /// Converted documents in input order
    pub documents: Vec<Document>,
}

/// Orchestrates reading HTML inputs, converting them and writing ASF.
pub struct Pipeline {
    config: Config,
    scanner: Scanner,
    writer: Writer,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let scanner = Scanner::new(&config);
        let writer = Writer::new(&config);

        Ok(Self {
            config,
            scanner,
            writer,
        })
    }

    /// Executes the pipeline and returns the converted documents with
    /// statistics.
    ///
    /// # Process
    ///
    /// 1. **Read**: Loads the input file, directory tree or stdin
    /// 2. **Convert**: Parses each input and transcodes it to ASF
    /// 3. **Write**: Persists outputs atomically (skipped in dry runs)
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use html2asf::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .input_path("./notebook.html")
    ///     .output_path("./notebook.xml")
    ///     .build()?;
    ///
    /// let report = Pipeline::new(config)?.run()?;
    /// report.stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(input = ?self.config.input))]
    pub fn run(self) -> Result<PipelineReport> {
        let start_time = Instant::now();

        info!("Stage 1/3: Reading input...");
        let scan_start = Instant::now();
        let sources = self.scanner.scan()?;
        let scan_duration = scan_start.elapsed();
        let input_bytes: usize = sources.iter().map(SourceFile::size_bytes).sum();

        info!(
            "✓ Read {} document(s), {} bytes in {:.2}s",
            sources.len(),
            input_bytes,
            scan_duration.as_secs_f64()
        );

        info!("Stage 2/3: Converting to storage format...");
        let convert_start = Instant::now();
        let documents: Vec<Document> = sources.iter().map(|s| self.convert(s)).collect();
        let convert_duration = convert_start.elapsed();

        let write_start = Instant::now();
        let files_written = if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
            0
        } else {
            info!("Stage 3/3: Writing output...");
            let written = self.writer.write_documents(&documents)?;
            let summary = self.writer.write_summary(&documents, start_time.elapsed())?;
            written + usize::from(summary)
        };
        let write_duration = write_start.elapsed();

        let stats = PipelineStats::new(
            &documents,
            input_bytes,
            files_written,
            start_time.elapsed(),
            scan_duration,
            convert_duration,
            write_duration,
        );

        info!(
            "✓ Pipeline completed successfully in {:.2}s",
            stats.duration.as_secs_f64()
        );

        Ok(PipelineReport { stats, documents })
    }

    /// Converts one source into a document.
    fn convert(&self, source: &SourceFile) -> Document {
        let root = parse_html(&source.content);
        let mut ctx = Context::new();
        let body = html_to_asf(content_root(&root), &mut ctx);

        let title = page_title(self.config.title.as_deref(), &root, source.path.as_deref());
        let output = if self.config.dry_run {
            None
        } else {
            self.writer.output_path(&source.relative_path)
        };

        debug!(
            "Converted {} as '{}' ({} attachments, {} page links)",
            source.label(),
            title,
            ctx.attachments().len(),
            ctx.page_links().len()
        );

        Document {
            source: source.path.clone(),
            output,
            title,
            conversion: Conversion {
                body,
                attachments: ctx.attachments().to_vec(),
                page_links: ctx.page_links().to_vec(),
            },
        }
    }
}
