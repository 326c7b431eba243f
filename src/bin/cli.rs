//! userfs CLI
//!
//! Runs a userfs script against a fresh in-memory filesystem.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use userfs::script::run_script;
use userfs::{Config, UserFs};

/// userfs CLI
#[derive(Parser, Debug)]
#[command(name = "userfs-cli")]
#[command(about = "Drive an in-memory block filesystem with a command script")]
#[command(version)]
struct Args {
    /// Script file to run (reads stdin when omitted)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Maximum size of a single file in bytes
    #[arg(short, long, default_value_t = userfs::MAX_FILE_SIZE)]
    max_file_size: usize,

    /// Log filter, overrides RUST_LOG (e.g. "debug", "userfs=trace")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging (stderr, so stdout carries only responses)
    let filter = match &args.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,userfs=debug")),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    tracing::info!("userfs CLI v{}", userfs::VERSION);

    let config = Config::builder().max_file_size(args.max_file_size).build();
    let mut fs = UserFs::with_config(config);

    let stdout = io::stdout();
    let result = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => {
                tracing::info!("Running script {}", path.display());
                run_script(&mut fs, BufReader::new(file), stdout.lock())
            }
            Err(e) => {
                tracing::error!("Failed to open script {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => run_script(&mut fs, io::stdin().lock(), stdout.lock()),
    };

    fs.destroy();

    match result {
        Ok(summary) => {
            tracing::info!("{} commands run, {} failed", summary.commands, summary.failures);
        }
        Err(e) => {
            tracing::error!("Script aborted: {}", e);
            std::process::exit(1);
        }
    }
}
