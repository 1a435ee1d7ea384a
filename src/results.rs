//! Per-file outcomes and their aggregation into run results.
//!
//! Workers report exactly one [`Outcome`] per submitted file over a channel;
//! a single collector folds them into [`RunResults`], so the aggregate is
//! written from one thread and needs no locking. Nothing in this module
//! touches the filesystem.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Why a file was deliberately left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is not a regular file, or vanished after listing.
    NotRegularFile,
    /// The name starts with `.` or `~`.
    HiddenOrTemporary,
    /// The extension marks a download still in progress.
    InProgressDownload,
    /// The file exceeds the configured size cap, carried here in bytes.
    TooLarge { limit_bytes: u64 },
    /// No category claims the file's extension.
    UnknownType,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRegularFile => f.write_str("Not a regular file"),
            Self::HiddenOrTemporary => f.write_str("Hidden or temporary file"),
            Self::InProgressDownload => f.write_str("File currently downloading"),
            // The cap is shown in gibibytes when it is a whole number of
            // them, otherwise as the exact byte count.
            Self::TooLarge { limit_bytes } => {
                if *limit_bytes >= BYTES_PER_GIB && limit_bytes % BYTES_PER_GIB == 0 {
                    write!(f, "File too large (>{}GB)", limit_bytes / BYTES_PER_GIB)
                } else {
                    write!(f, "File too large (>{} bytes)", limit_bytes)
                }
            }
            Self::UnknownType => f.write_str("Unknown file type"),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The single verdict produced for one submitted file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The file was moved into a category folder.
    Moved {
        file_name: String,
        category: String,
        /// Where the file ended up, after conflict resolution.
        destination: PathBuf,
    },
    /// The file was left in place on purpose.
    Skipped {
        file_name: String,
        reason: SkipReason,
    },
    /// The move was attempted and failed. The source file is still present
    /// unless the failure happened after a completed copy.
    Error { file_name: String, message: String },
}

impl Outcome {
    /// The file name this outcome is about.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Moved { file_name, .. }
            | Self::Skipped { file_name, .. }
            | Self::Error { file_name, .. } => file_name,
        }
    }
}

/// Counters for one organization run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Files present in the directory when it was listed.
    pub total_files: usize,
    pub moved: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Wall-clock duration of the run.
    #[serde(rename = "execution_seconds", serialize_with = "serialize_seconds")]
    pub elapsed: Duration,
}

/// Serializes a duration as seconds rounded to two decimals.
fn serialize_seconds<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64((elapsed.as_secs_f64() * 100.0).round() / 100.0)
}

/// Aggregate of one organization run.
///
/// Owned and written by a single collector; everything else reads it after
/// the run has finished.
#[derive(Debug, Serialize)]
pub struct RunResults {
    /// The directory that was organized.
    pub base_path: PathBuf,
    /// When the run started, UTC.
    pub started_at: DateTime<Utc>,
    /// Moved file names grouped by category, in category name order.
    pub moved: BTreeMap<String, Vec<String>>,
    /// Skipped file names with the reason for each.
    pub skipped: Vec<(String, SkipReason)>,
    /// Failed file names with the failure message for each.
    pub errors: Vec<(String, String)>,
    pub stats: RunStats,
    /// True when the run stopped drawing files before the directory was
    /// fully drained.
    pub cancelled: bool,
}

impl RunResults {
    /// Creates an empty aggregate for a directory with `total_files` files.
    pub fn new(base_path: PathBuf, total_files: usize) -> Self {
        Self {
            base_path,
            started_at: Utc::now(),
            moved: BTreeMap::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            stats: RunStats {
                total_files,
                ..RunStats::default()
            },
            cancelled: false,
        }
    }

    /// Folds one outcome into the aggregate.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Moved {
                file_name, category, ..
            } => {
                self.moved.entry(category).or_default().push(file_name);
                self.stats.moved += 1;
            }
            Outcome::Skipped { file_name, reason } => {
                self.skipped.push((file_name, reason));
                self.stats.skipped += 1;
            }
            Outcome::Error { file_name, message } => {
                self.errors.push((file_name, message));
                self.stats.errors += 1;
            }
        }
    }

    /// Files accounted for so far. Equals `stats.total_files` once an
    /// uncancelled run has finished.
    pub fn processed(&self) -> usize {
        self.stats.moved + self.stats.skipped + self.stats.errors
    }

    /// Marks the run finished.
    pub fn finish(&mut self, elapsed: Duration, cancelled: bool) {
        self.stats.elapsed = elapsed;
        self.cancelled = cancelled;
    }
}
