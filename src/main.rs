//! Main entry point for the unzipper CLI application.
//!
//! Scans the working directory for archives, then runs the requested
//! extraction or zip creation and reports the status and elapsed time.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use unzipper::builder::default_archive_name;
use unzipper::cli::Command;
use unzipper::{Cli, OperationResult, Unzipper, ZipBuilder};

fn main() -> Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let unzipper = Unzipper::new(cli.config())
        .with_context(|| format!("cannot list archives in {}", cli.dir.display()))?;
    let config = unzipper.config();

    let status = match &cli.command {
        // List mode: print the scanned archives and exit
        Command::List => {
            for archive in unzipper.archives() {
                println!("{}", archive.name);
            }
            return Ok(());
        }
        Command::Extract {
            archive,
            destination,
        } => unzipper.extract(archive, destination.as_deref().unwrap_or(Path::new(""))),
        // Zip mode: paths resolve against the scanned directory, and the
        // output gets a timestamped name unless one is given
        Command::Zip { source, output } => {
            let output = match output {
                Some(path) => config.working_dir.join(path),
                None => config
                    .working_dir
                    .join(default_archive_name(chrono::Local::now().naive_local())),
            };
            ZipBuilder::new(config.capabilities).create_zip(config.working_dir.join(source), output)
        }
    };

    report(status, &cli, started)
}

/// Report the result of an extraction or zip creation.
///
/// On success the status line and the execution time go to stdout. On
/// failure the execution time goes to stderr and the error is returned so
/// `main` exits with a non-zero status and prints the message.
///
/// # Arguments
///
/// * `status` - Result of the operation that ran
/// * `cli` - Parsed command-line arguments, for quiet mode
/// * `started` - When the request started, measured before argument parsing
///
/// # Returns
///
/// Returns `Ok(())` on success, or the operation error.
fn report(status: OperationResult, cli: &Cli, started: Instant) -> Result<()> {
    let elapsed = started.elapsed().as_secs_f64();

    match status {
        Ok(outcome) => {
            // Quiet mode suppresses everything but errors
            if !cli.quiet {
                println!("Status: {}", outcome);
                println!("Execution time: {:.4} seconds", elapsed);
            }
            Ok(())
        }
        Err(err) => {
            // The message itself is printed by anyhow when main returns
            log::debug!("{} failed after {:.4} seconds", err.kind(), elapsed);
            if !cli.quiet {
                eprintln!("Execution time: {:.4} seconds", elapsed);
            }
            Err(err.into())
        }
    }
}
