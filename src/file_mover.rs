//! Conflict-safe relocation of files into category folders.
//!
//! Name conflicts are resolved by suffixing `_1`, `_2`, ... before the
//! extension. The free-name probe and the rename are separate steps, so two
//! processes organizing the same folder can both pick the same candidate
//! and the later rename wins; a single run never races itself here because
//! source names within one directory are unique.

use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on collision-suffix probes for one destination.
const MAX_SUFFIX_ATTEMPTS: u32 = 10_000;

/// Errors that can occur while organizing a downloads folder.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target directory could not be listed. Fatal to the whole run.
    DirectoryAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A category folder could not be created.
    FolderCreation {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file could not be relocated.
    Move {
        source_path: PathBuf,
        destination: PathBuf,
        source: std::io::Error,
    },
    /// Every candidate name up to the probe limit was taken.
    ResolverExhausted { path: PathBuf },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryAccess { path, source } => {
                write!(f, "Cannot access directory {}: {}", path.display(), source)
            }
            Self::FolderCreation { path, source } => {
                write!(
                    f,
                    "Failed to create category folder {}: {}",
                    path.display(),
                    source
                )
            }
            Self::Move {
                source_path,
                destination,
                source,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source_path.display(),
                    destination.display(),
                    source
                )
            }
            Self::ResolverExhausted { path } => {
                write!(
                    f,
                    "No free destination name for {} after {} attempts",
                    path.display(),
                    MAX_SUFFIX_ATTEMPTS
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves files into category subdirectories of a base directory.
pub struct FileMover;

impl FileMover {
    /// Picks a destination path that does not collide with an existing file.
    ///
    /// Returns `desired` itself when it is free, otherwise the first free
    /// `{stem}_{n}{extension}` variant, counting from 1. The counter goes
    /// before the final extension only, so `backup.tar.gz` becomes
    /// `backup.tar_1.gz`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use downsort::file_mover::FileMover;
    /// use std::path::Path;
    ///
    /// let destination = FileMover::resolve_destination(Path::new("/downloads/images/photo.jpg"));
    /// match destination {
    ///     Ok(path) => println!("Will move to {}", path.display()),
    ///     Err(e) => eprintln!("No destination: {}", e),
    /// }
    /// ```
    pub fn resolve_destination(desired: &Path) -> OrganizeResult<PathBuf> {
        if !desired.exists() {
            return Ok(desired.to_path_buf());
        }

        let stem = desired
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("file");
        let extension = desired.extension().and_then(|ext| ext.to_str());
        let parent = desired.parent().unwrap_or(Path::new("."));

        for attempt in 1..=MAX_SUFFIX_ATTEMPTS {
            let candidate_name = match extension {
                Some(ext) => format!("{}_{}.{}", stem, attempt, ext),
                None => format!("{}_{}", stem, attempt),
            };
            let candidate = parent.join(candidate_name);
            if !candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(OrganizeError::ResolverExhausted {
            path: desired.to_path_buf(),
        })
    }

    /// Moves `file_path` into the `category` subdirectory of `base_path`,
    /// creating the folder if needed and resolving name conflicts.
    ///
    /// Returns the path the file ended up at.
    pub fn move_into_category(
        base_path: &Path,
        file_path: &Path,
        category: &str,
    ) -> OrganizeResult<PathBuf> {
        let category_path = base_path.join(category);

        // Another worker may create the folder between our probe and the
        // syscall, so an existing folder is success, not an error.
        match fs::create_dir(&category_path) {
            Ok(()) => {}
            Err(source) if source.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(source) => {
                return Err(OrganizeError::FolderCreation {
                    path: category_path,
                    source,
                });
            }
        }

        let file_name = file_path.file_name().ok_or_else(|| OrganizeError::Move {
            source_path: file_path.to_path_buf(),
            destination: category_path.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })?;

        let destination = Self::resolve_destination(&category_path.join(file_name))?;
        Self::relocate(file_path, &destination)?;
        Ok(destination)
    }

    /// Renames when possible, falling back to copy plus delete. The source
    /// is removed only after the copy has succeeded.
    fn relocate(source_path: &Path, destination: &Path) -> OrganizeResult<()> {
        match fs::rename(source_path, destination) {
            Ok(()) => Ok(()),
            Err(rename_error) => {
                tracing::warn!(
                    source = %source_path.display(),
                    destination = %destination.display(),
                    error = %rename_error,
                    "rename failed, falling back to copy and delete"
                );

                fs::copy(source_path, destination).map_err(|source| OrganizeError::Move {
                    source_path: source_path.to_path_buf(),
                    destination: destination.to_path_buf(),
                    source,
                })?;

                fs::remove_file(source_path).map_err(|source| OrganizeError::Move {
                    source_path: source_path.to_path_buf(),
                    destination: destination.to_path_buf(),
                    source,
                })
            }
        }
    }
}
