//! Fetch changes from the upstream mobs_monster mod into the tree_monster module

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use modsync::{
    ConsoleProgressReporter, IntoProgressCallback, SyncConfig, SyncError, SyncMetricsSnapshot,
    Syncer,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Exit status for a fatal fetch or a missing required file (ENOENT)
const EXIT_NOT_FOUND: u8 = 2;
const EXIT_FAILURE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "modsync")]
#[command(about = "Fetch changes from the upstream mobs_monster mod")]
struct Cli {
    /// Use reference `refname` instead of "master"
    #[arg(long = "ref", value_name = "refname", require_equals = true, action = ArgAction::Append)]
    refs: Vec<String>,

    /// Module directory to update
    #[arg(short = 'C', long, value_name = "dir", default_value = ".")]
    directory: PathBuf,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// First `--ref` wins; later ones are ignored
    fn revision(&self) -> Option<&str> {
        self.refs.first().map(String::as_str)
    }

    fn config(&self, root: PathBuf) -> SyncConfig {
        let mut builder = SyncConfig::builder().root(root);
        if let Some(revision) = self.revision() {
            builder = builder.revision(revision);
        }
        builder.build()
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<SyncMetricsSnapshot> {
    let root = std::fs::canonicalize(&cli.directory)
        .with_context(|| format!("module directory '{}' is not accessible", cli.directory.display()))?;
    debug!("Module directory: {}", root.display());

    let progress = ConsoleProgressReporter::new(cli.verbose).into_callback();
    let syncer = Syncer::new(cli.config(root), Some(progress))?;
    Ok(syncer.run().await?)
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(sync) = err.downcast_ref::<SyncError>() {
        if sync.is_not_found() {
            return EXIT_NOT_FOUND;
        }
    }
    if let Some(io) = err.downcast_ref::<std::io::Error>() {
        if io.kind() == std::io::ErrorKind::NotFound {
            return EXIT_NOT_FOUND;
        }
    }
    EXIT_FAILURE
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // help goes to stdout and is not an error
            let code = if e.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(summary) => {
            println!("sync complete: {}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(sync) = e.downcast_ref::<SyncError>() {
                error!(category = sync.category(), "sync failed");
            }
            eprintln!("\nERROR: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}
