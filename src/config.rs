//! Organizer configuration.
//!
//! This module loads the run configuration from TOML and compiles it into
//! the runtime [`Settings`] the organizer consumes. The configurable surface
//! is the worker count, the size cap, the in-progress download markers, and
//! the category table itself.
//!
//! # Configuration File Format
//!
//! Configuration is stored in TOML format with the following structure:
//!
//! ```toml
//! concurrency = 4
//! max_file_size_bytes = 10737418240
//! in_progress_extensions = [".crdownload", ".part", ".tmp"]
//!
//! [[categories]]
//! name = "images"
//! extensions = [".jpg", ".png"]
//!
//! [[categories]]
//! name = "documents"
//! extensions = [".pdf", ".txt"]
//! ```
//!
//! `[[categories]]` is an ordered array of tables and that order is
//! significant: classification is first-match-wins, so a category listed
//! earlier claims any extension it shares with a later one. When no
//! categories are configured the built-in table is used.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::file_category::{CategoryRule, CategoryTable, normalize_extension};

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
    /// `concurrency` must be at least 1.
    InvalidConcurrency(usize),
    /// A category entry with an empty name.
    UnnamedCategory,
    /// A category entry that claims no extensions.
    EmptyCategory(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
            ConfigError::InvalidConcurrency(value) => {
                write!(f, "Concurrency must be at least 1, got {}", value)
            }
            ConfigError::UnnamedCategory => write!(f, "Category entries must have a name"),
            ConfigError::EmptyCategory(name) => {
                write!(f, "Category '{}' lists no extensions", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// One `[[categories]]` entry: a destination folder name and the extensions
/// it claims.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub extensions: Vec<String>,
}

/// Configuration for one organization run, as deserialized from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizerConfig {
    /// Number of worker threads. Defaults to 4.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Files larger than this are skipped. Defaults to 10 GiB.
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Extensions marking a download still in progress.
    #[serde(default = "default_in_progress_extensions")]
    pub in_progress_extensions: Vec<String>,

    /// Ordered category table. Empty means "use the built-in table".
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

fn default_concurrency() -> usize {
    4
}

fn default_max_file_size_bytes() -> u64 {
    10 * 1024 * 1024 * 1024
}

fn default_in_progress_extensions() -> Vec<String> {
    vec![
        ".crdownload".to_string(),
        ".part".to_string(),
        ".tmp".to_string(),
    ]
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_file_size_bytes: default_max_file_size_bytes(),
            in_progress_extensions: default_in_progress_extensions(),
            categories: Vec::new(),
        }
    }
}

impl OrganizerConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.downsortrc.toml` in the current directory
    /// 3. Look for `downsort/config.toml` in the user config directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".downsortrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("downsort").join("config.toml");
            if user_config.exists() {
                return Self::load_from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Validate and normalize the configuration into runtime [`Settings`].
    ///
    /// Extensions are lowercased and dot-prefixed here, once, so lookups
    /// during the run are plain set membership tests.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero concurrency or a malformed category entry.
    pub fn compile(self) -> Result<Settings, ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency));
        }

        let in_progress_extensions = self
            .in_progress_extensions
            .iter()
            .map(|extension| normalize_extension(extension))
            .collect();

        let table = if self.categories.is_empty() {
            CategoryTable::builtin()
        } else {
            let mut rules = Vec::with_capacity(self.categories.len());
            for category in &self.categories {
                if category.name.trim().is_empty() {
                    return Err(ConfigError::UnnamedCategory);
                }
                if category.extensions.is_empty() {
                    return Err(ConfigError::EmptyCategory(category.name.clone()));
                }
                let extensions: Vec<&str> =
                    category.extensions.iter().map(String::as_str).collect();
                rules.push(CategoryRule::new(&category.name, &extensions));
            }
            CategoryTable::new(rules)
        };

        Ok(Settings {
            concurrency: self.concurrency,
            max_file_size_bytes: self.max_file_size_bytes,
            in_progress_extensions,
            table,
        })
    }
}

/// Compiled runtime settings consumed by the organizer.
///
/// Everything here is normalized: extensions are lowercase with a leading
/// dot and the category table is ready for lookup. Shared read-only across
/// all workers.
#[derive(Debug, Clone)]
pub struct Settings {
    pub concurrency: usize,
    pub max_file_size_bytes: u64,
    pub in_progress_extensions: HashSet<String>,
    pub table: CategoryTable,
}
