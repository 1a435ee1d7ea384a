//! The concurrent organization run.
//!
//! [`DownloadsOrganizer`] lists the target directory once, snapshots every
//! file, and fans the snapshots out to a bounded pool of worker threads.
//! Each submitted file produces exactly one [`Outcome`], streamed over a
//! channel to the single collector that owns the [`RunResults`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Instant;

use crate::config::Settings;
use crate::file_mover::{FileMover, OrganizeError, OrganizeResult};
use crate::results::{Outcome, RunResults, SkipReason};

/// Snapshot of one directory entry, taken at listing time.
///
/// Workers judge eligibility against this snapshot; only the final
/// is-a-file re-check and the move itself consult the live filesystem.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Base name, lossily decoded for reporting.
    pub file_name: String,
    /// Final suffix, lowercased with a leading dot. `None` when the name
    /// has no suffix.
    pub extension: Option<String>,
    /// Size at listing time. `None` when the metadata read failed; such a
    /// file passes the size gate.
    pub size: Option<u64>,
}

impl FileEntry {
    /// Builds a snapshot from a path and an already-read size.
    pub fn snapshot(path: PathBuf, size: Option<u64>) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()));
        Self {
            path,
            file_name,
            extension,
            size,
        }
    }
}

/// Organizes the immediate children of one directory into category folders.
///
/// The organizer never descends into subdirectories and never follows the
/// files it has already moved.
///
/// # Examples
///
/// ```no_run
/// use downsort::config::OrganizerConfig;
/// use downsort::organizer::DownloadsOrganizer;
/// use std::path::PathBuf;
///
/// let settings = OrganizerConfig::default().compile()?;
/// let organizer = DownloadsOrganizer::new(PathBuf::from("/home/me/Downloads"), settings);
/// let results = organizer.run()?;
/// println!("moved {} files", results.stats.moved);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DownloadsOrganizer {
    base_path: PathBuf,
    settings: Settings,
    cancel: Arc<AtomicBool>,
}

impl DownloadsOrganizer {
    pub fn new(base_path: PathBuf, settings: Settings) -> Self {
        Self {
            base_path,
            settings,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The directory this organizer operates on.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Flag observed by workers between files. Once set, no new files are
    /// drawn; in-flight files still finish and get recorded.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Runs the full organization pass.
    ///
    /// Fails only when the directory itself cannot be listed. Per-file
    /// problems are folded into the results, never returned as errors.
    pub fn run(&self) -> OrganizeResult<RunResults> {
        self.run_with_observer(|_, _, _| {})
    }

    /// Like [`run`](Self::run), with a callback invoked after each outcome
    /// is collected. The callback receives the number of files processed so
    /// far, the total, and the outcome itself; it runs on the collecting
    /// thread, so it may hold non-`Sync` state such as a progress bar.
    pub fn run_with_observer<F>(&self, mut observe: F) -> OrganizeResult<RunResults>
    where
        F: FnMut(usize, usize, &Outcome),
    {
        let timer = Instant::now();
        tracing::info!(path = %self.base_path.display(), "starting organization");

        let entries = self.list_entries()?;
        let total = entries.len();
        let mut results = RunResults::new(self.base_path.clone(), total);

        if entries.is_empty() {
            tracing::info!("no files found to organize");
            results.finish(timer.elapsed(), self.cancel.load(Ordering::SeqCst));
            return Ok(results);
        }

        let workers = self.settings.concurrency.min(total);
        tracing::info!(files = total, workers, "processing files");

        let cursor = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<Outcome>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let cursor = &cursor;
                let entries = &entries;
                scope.spawn(move || {
                    loop {
                        if self.cancel.load(Ordering::SeqCst) {
                            break;
                        }
                        let index = cursor.fetch_add(1, Ordering::SeqCst);
                        let Some(entry) = entries.get(index) else {
                            break;
                        };
                        // The collector hangs up only when the run is over.
                        if tx.send(self.evaluate(entry)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(tx);

            let mut processed = 0;
            for outcome in rx {
                processed += 1;
                observe(processed, total, &outcome);
                results.record(outcome);
            }
        });

        let cancelled = self.cancel.load(Ordering::SeqCst);
        results.finish(timer.elapsed(), cancelled);

        if cancelled {
            tracing::warn!(
                processed = results.processed(),
                total,
                "organization interrupted"
            );
        } else {
            tracing::info!(
                moved = results.stats.moved,
                skipped = results.stats.skipped,
                errors = results.stats.errors,
                seconds = results.stats.elapsed.as_secs_f64(),
                "organization complete"
            );
        }
        Ok(results)
    }

    /// Lists the directory once and snapshots everything that is a file at
    /// this moment. Follows symlinks, so a link to a regular file counts
    /// while directories and dangling links drop out here.
    fn list_entries(&self) -> OrganizeResult<Vec<FileEntry>> {
        let reader =
            fs::read_dir(&self.base_path).map_err(|source| OrganizeError::DirectoryAccess {
                path: self.base_path.clone(),
                source,
            })?;

        let mut entries = Vec::new();
        for dir_entry in reader.flatten() {
            let path = dir_entry.path();
            let metadata = fs::metadata(&path).ok();
            if metadata.as_ref().is_some_and(|meta| meta.is_file()) {
                entries.push(FileEntry::snapshot(path, metadata.map(|meta| meta.len())));
            }
        }
        Ok(entries)
    }

    /// Decides the fate of one file: the ordered eligibility checks, then
    /// classification, then the move. Always produces exactly one outcome;
    /// move failures become `Outcome::Error`, never a propagated error.
    pub fn evaluate(&self, entry: &FileEntry) -> Outcome {
        // Re-check against the live filesystem; the file may have vanished
        // or been replaced since listing.
        if !entry.path.is_file() {
            return Outcome::Skipped {
                file_name: entry.file_name.clone(),
                reason: SkipReason::NotRegularFile,
            };
        }

        if entry.file_name.starts_with('.') || entry.file_name.starts_with('~') {
            return Outcome::Skipped {
                file_name: entry.file_name.clone(),
                reason: SkipReason::HiddenOrTemporary,
            };
        }

        if let Some(extension) = &entry.extension
            && self.settings.in_progress_extensions.contains(extension.as_str())
        {
            return Outcome::Skipped {
                file_name: entry.file_name.clone(),
                reason: SkipReason::InProgressDownload,
            };
        }

        if let Some(size) = entry.size
            && size > self.settings.max_file_size_bytes
        {
            return Outcome::Skipped {
                file_name: entry.file_name.clone(),
                reason: SkipReason::TooLarge {
                    limit_bytes: self.settings.max_file_size_bytes,
                },
            };
        }

        let Some(category) = self.settings.table.classify_name(&entry.file_name) else {
            return Outcome::Skipped {
                file_name: entry.file_name.clone(),
                reason: SkipReason::UnknownType,
            };
        };

        match FileMover::move_into_category(&self.base_path, &entry.path, category) {
            Ok(destination) => {
                tracing::debug!(
                    file = %entry.file_name,
                    category,
                    destination = %destination.display(),
                    "moved"
                );
                Outcome::Moved {
                    file_name: entry.file_name.clone(),
                    category: category.to_string(),
                    destination,
                }
            }
            Err(error) => {
                tracing::error!(file = %entry.file_name, error = %error, "move failed");
                Outcome::Error {
                    file_name: entry.file_name.clone(),
                    message: format!("Move operation failed: {}", error),
                }
            }
        }
    }
}
