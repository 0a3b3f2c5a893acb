//! FEMO selector process.
//!
//! Runs the selector side of the file-based protocol until the variator asks
//! it to terminate.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use femo::{IoResultExt, SelectorBuilder, SelectorError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "femo", version)]
#[command(about = "FEMO selector for file-coordinated multi-objective optimization")]
struct Cli {
    /// Local parameter file (starts with `seed <n>`)
    param_file: PathBuf,

    /// Prefix of the shared files, e.g. `../run/PISA_`
    prefix: String,

    /// Poll interval in seconds
    poll: f64,

    /// Append diagnostics to this file instead of standard error
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    if let Err(e) = init_tracing(cli.log_file.as_deref()) {
        eprintln!("femo: {}", e);
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "selector aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> femo::Result<()> {
    let poll_interval = Duration::try_from_secs_f64(cli.poll).map_err(|e| {
        SelectorError::Configuration(format!("invalid poll interval {}: {}", cli.poll, e))
    })?;

    let mut selector = SelectorBuilder::new()
        .with_prefix(&cli.prefix)
        .with_local_parameters(&cli.param_file)
        .with_poll_interval(poll_interval)
        .build()?;

    info!(
        prefix = %cli.prefix,
        param_file = %cli.param_file.display(),
        poll = ?poll_interval,
        "starting selector"
    );
    selector.run()
}

fn init_tracing(log_file: Option<&Path>) -> femo::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("femo=info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_path(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
