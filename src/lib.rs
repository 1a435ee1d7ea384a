//! downsort - organize a downloads folder into category subdirectories
//!
//! This library classifies files by extension against an ordered category
//! table, moves them into per-category folders with conflict-safe renaming,
//! and runs the whole pass over a bounded pool of worker threads. Per-file
//! problems are folded into the run results instead of aborting the run.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_mover;
pub mod organizer;
pub mod output;
pub mod paths;
pub mod results;

pub use config::{ConfigError, OrganizerConfig, Settings};
pub use file_category::{CategoryRule, CategoryTable};
pub use file_mover::{FileMover, OrganizeError, OrganizeResult};
pub use organizer::{DownloadsOrganizer, FileEntry};
pub use results::{Outcome, RunResults, RunStats, SkipReason};

pub use cli::{Cli, run_cli};
