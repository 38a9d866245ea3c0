mod error;

use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use sidematch_library::TracingObserver;
use sidematch_report::Targets;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Match every sidecar in a Google Photos Takeout export to the media file it
/// describes, then write CSV reports of the result.
#[derive(Parser, Debug)]
#[command(name = "sidematch", version, about)]
struct Args {
    /// Config file (TOML, YAML or JSON)
    #[arg(short, long, env = "SIDEMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Directory the export was extracted into; overrides the config file
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// More output; repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| format!("sidematch={level}").into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = sidematch_config::load(args.config.as_deref(), args.root.as_deref()).or_raise(|| ErrorKind::Config)?;
    let root = config.library_root();
    tracing::info!(root = %root.display(), "Starting");

    let ctx = sidematch_library::run(&root, config.overrides, &mut TracingObserver).or_raise(|| ErrorKind::Library)?;

    let targets = Targets {
        json: config.reports.json,
        files: config.reports.files,
        extra: config.reports.extra,
    };
    sidematch_report::export(ctx.store(), &targets).or_raise(|| ErrorKind::Report)?;

    let summary = ctx.summary();
    tracing::info!(
        sidecars = summary.sidecars,
        matched = summary.matched,
        file_missing = summary.file_missing,
        ambiguous = summary.ambiguous,
        parse_errors = summary.parse_errors,
        collisions = summary.collisions,
        "Sidecars"
    );
    tracing::info!(
        media = summary.media,
        primary = summary.primary,
        extra = summary.extra,
        unmatched = summary.unmatched,
        ignored = summary.ignored,
        "Media files"
    );
    Ok(())
}
