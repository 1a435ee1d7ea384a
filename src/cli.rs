//! Command-line interface module for downsort.
//!
//! This module handles argument parsing, logging setup, and the
//! orchestration that ties configuration, downloads-folder detection, the
//! organizer, and the report together.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use clap::Parser;
use indicatif::ProgressBar;

use crate::config::OrganizerConfig;
use crate::organizer::DownloadsOrganizer;
use crate::output::OutputFormatter;
use crate::paths;

#[derive(Parser)]
#[command(name = "downsort")]
#[command(version)]
#[command(about = "Organize a downloads folder into category subdirectories")]
#[command(
    long_about = "Downsort sorts the files in a downloads folder into category \
subdirectories (images, documents, archives, ...) based on their extensions, \
using a small pool of worker threads. Hidden files, in-progress downloads and \
oversized files are left in place, and name conflicts are resolved by \
suffixing a counter."
)]
pub struct Cli {
    /// Directory to organize (the downloads folder is auto-detected when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Number of worker threads (overrides the configuration file)
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the results as JSON instead of the human report
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Installs the global tracing subscriber, writing to stderr so that
    /// JSON output on stdout stays clean.
    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Runs the CLI application.
///
/// Returns `Ok(true)` when the run was interrupted, `Ok(false)` on a normal
/// finish, and an error message for run-fatal failures.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use downsort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["downsort", "/path/to/downloads"]);
/// match run_cli(&cli) {
///     Ok(_) => println!("Done"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<bool, String> {
    let mut config = OrganizerConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    if let Some(workers) = cli.workers {
        config.concurrency = workers;
    }
    let settings = config
        .compile()
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    let base_path = match &cli.path {
        Some(path) => path.clone(),
        None => paths::detect_downloads_dir()
            .ok_or_else(|| "Could not detect a downloads folder; pass a directory".to_string())?,
    };
    if !base_path.is_dir() {
        return Err(format!("Not a directory: {}", base_path.display()));
    }

    let organizer = DownloadsOrganizer::new(base_path, settings);

    let cancel = organizer.cancel_flag();
    ctrlc::set_handler(move || {
        cancel.store(true, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to install interrupt handler: {}", e))?;

    let results = if cli.json {
        organizer.run().map_err(|e| e.to_string())?
    } else {
        OutputFormatter::info(&format!(
            "Organizing contents of: {}",
            organizer.base_path().display()
        ));

        // Created on the first outcome, once the total is known.
        let mut bar: Option<ProgressBar> = None;
        let results = organizer
            .run_with_observer(|processed, total, outcome| {
                let bar =
                    bar.get_or_insert_with(|| OutputFormatter::create_progress_bar(total as u64));
                bar.set_message(outcome.file_name().to_string());
                bar.set_position(processed as u64);
            })
            .map_err(|e| e.to_string())?;
        if let Some(bar) = bar.take() {
            bar.finish_and_clear();
        }
        results
    };

    if cli.json {
        let rendered = serde_json::to_string_pretty(&results)
            .map_err(|e| format!("Failed to encode results: {}", e))?;
        println!("{}", rendered);
    } else {
        OutputFormatter::print_report(&results);
    }

    Ok(results.cancelled)
}
