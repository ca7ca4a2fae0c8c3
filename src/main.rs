use anyhow::Context;
use clap::Parser;
use html2asf::{Config, Pipeline, Sink, Source};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "html2asf",
    version,
    author,
    about = "Convert HTML into Confluence storage format",
    long_about = "Convert HTML into Atlassian Storage Format (ASF), the markup Confluence stores pages in.\n\n\
    Links become page-link macros, images become attachment or URL image macros, and \
    markup Confluence does not understand is flattened to its content.\n\n\
    USAGE EXAMPLES:\n  \
      # Convert stdin to stdout\n  \
      cat page.html | html2asf\n\n  \
      # Convert a file\n  \
      html2asf page.html -o page.xml\n\n  \
      # Convert a directory tree of exports\n  \
      html2asf ./exports -o ./storage --stats"
)]
struct Cli {
    /// HTML file or directory to convert; `-` reads stdin
    #[arg(default_value = "-", value_name = "INPUT")]
    input: PathBuf,

    /// Output file, or output directory for directory inputs (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Extension of files written into an output directory
    #[arg(long, default_value = "xml", value_name = "EXT")]
    ext: String,

    /// Page title override (default: first heading, then file name)
    #[arg(short, long, value_name = "TITLE")]
    title: Option<String>,

    /// Dry run (convert but don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing outputs without keeping a backup
    #[arg(long)]
    no_backup: bool,

    /// Don't write summary.json into directory outputs
    #[arg(long)]
    no_summary: bool,

    /// Print a conversion summary to stderr
    #[arg(long)]
    stats: bool,

    /// Print the page title and referenced attachments/pages as JSON instead of the body
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let mut builder = Config::builder()
        .input(Source::from_arg(cli.input))
        .output(cli.output.map_or(Sink::Stdout, Sink::Path))
        .extension(cli.ext)
        .dry_run(cli.dry_run)
        .backup_existing(!cli.no_backup)
        .write_summary(!cli.no_summary);

    if let Some(title) = cli.title {
        builder = builder.title(title);
    }

    let config = builder.build().context("Failed to build configuration")?;
    let to_stdout = matches!(config.output, Sink::Stdout);

    let report = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Conversion failed")?;

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut stdout, &report.documents)
            .context("Failed to serialize documents")?;
        writeln!(stdout)?;
    } else if to_stdout {
        for doc in &report.documents {
            writeln!(stdout, "{}", doc.conversion.body).context("Failed to write to stdout")?;
        }
    }

    if cli.stats {
        report.stats.print_summary();
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("html2asf=warn"),
        1 => EnvFilter::new("html2asf=info"),
        2 => EnvFilter::new("html2asf=debug"),
        _ => EnvFilter::new("html2asf=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();
}
