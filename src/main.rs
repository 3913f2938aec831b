mod cli;
mod error;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use specfetch_config::Config;
use specfetch_fetch::backend::HttpFetcher;
use specfetch_library::convert::convert;
use specfetch_library::download::download;
use specfetch_library::error::{Error as LibraryError, ErrorKind as LibraryErrorKind};
use specfetch_library::merge::{MergeOptions, merge};
use specfetch_library::{Context, Layout, Report};
use specfetch_pdf::{DocumentConverter, MergeTool, Merger};
use specfetch_release::Release;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::instrument;
use tracing_subscriber::EnvFilter;

/// The external programs used after downloading.
struct Finishing {
    converter: DocumentConverter,
    merger: Merger,
    options: MergeOptions,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(failures) if failures.is_empty() => ExitCode::SUCCESS,
        Ok(failures) => {
            eprintln!("{} task(s) failed:", failures.len());
            for failure in &failures {
                eprintln!("  - {}", describe(failure));
            }
            ExitCode::FAILURE
        },
        Err(err) => {
            let kind: &ErrorKind = &err;
            eprintln!("error: {kind}");
            tracing::debug!("{err:?}");
            ExitCode::from(2)
        },
    }
}

/// `<failure>: <innermost cause>`, following the first child at each level
/// of the error tree.
fn describe(failure: &LibraryError) -> String {
    let kind: &LibraryErrorKind = failure;
    let mut frame = failure.frame();
    while let Some(child) = frame.children().first() {
        frame = child;
    }
    let cause = frame.error().to_string();
    let summary = kind.to_string();
    if cause == summary { summary } else { format!("{summary}: {cause}") }
}

/// `RUST_LOG` wins unless `-v` was given; the default is `info`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

/// Runs every release and series combination, returning the failures of all
/// batches. Only setup problems are fatal.
async fn run(cli: &Cli) -> Result<Vec<LibraryError>> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    cli.apply(&mut config);
    config.validate().or_raise(|| ErrorKind::Config)?;

    let mode = cli.mode.mode();
    let layout = Layout::from(cli.filetype);
    tracing::debug!(?mode, %layout, workers = config.workers, "Configuration loaded");

    let ctx = if mode.downloads() {
        let fetcher = HttpFetcher::new(&config.user_agent, config.connect_timeout()).or_raise(|| ErrorKind::Client)?;
        Some(Context::new(Arc::new(fetcher), layout, &config))
    } else {
        None
    };
    let finishing = match (mode.merges(), layout) {
        (true, Layout::Doc) => Some(prepare_finishing(&config)?),
        (true, Layout::Pdf) => {
            tracing::info!("Published PDFs are complete documents; skipping conversion and merging");
            None
        },
        (false, _) => None,
    };

    let mut failures = Vec::new();
    for &release in &cli.releases {
        for &series in &cli.series {
            let destination = cli.destination(series, release);
            tokio::fs::create_dir_all(&destination).await.or_raise(|| ErrorKind::Destination(destination.clone()))?;
            failures.extend(run_batch(ctx.as_ref(), finishing.as_ref(), series, release, &destination).await);
        }
    }
    Ok(failures)
}

fn prepare_finishing(config: &Config) -> Result<Finishing> {
    let merger = match &config.merge_tool {
        Some(path) => Merger::new(MergeTool::from_path(path.clone()), config.merge_timeout()),
        None => Merger::discover(config.merge_timeout()).or_raise(|| ErrorKind::MergeTool)?,
    };
    tracing::debug!(tool = %merger.tool().path().display(), "Using merge tool");
    Ok(Finishing {
        converter: DocumentConverter::discover(config.convert_timeout()),
        merger,
        options: MergeOptions {
            delete_originals: config.delete_originals,
            workers: config.workers,
            ..MergeOptions::default()
        },
    })
}

#[instrument(skip_all, fields(series = series, release = %release, destination = %destination.display()))]
async fn run_batch(
    ctx: Option<&Context>,
    finishing: Option<&Finishing>,
    series: u8,
    release: Release,
    destination: &Path,
) -> Vec<LibraryError> {
    let mut failures = Vec::new();
    if let Some(ctx) = ctx {
        let report = Report::collect(download(ctx, series, release, destination)).await;
        tracing::info!(folders = report.completed.len(), failed = report.failures.len(), "Download finished");
        failures.extend(report.failures);
    }
    if let Some(Finishing {
        converter,
        merger,
        options,
    }) = finishing
    {
        let report = Report::collect(convert(converter, destination, series, options.workers)).await;
        tracing::info!(converted = report.completed.len(), failed = report.failures.len(), "Conversion finished");
        failures.extend(report.failures);

        let report = Report::collect(merge(merger, destination, options)).await;
        tracing::info!(merged = report.completed.len(), failed = report.failures.len(), "Merge finished");
        failures.extend(report.failures);
    }
    failures
}
