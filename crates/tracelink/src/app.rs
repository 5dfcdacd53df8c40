//! Application context for CLI command execution.
//!
//! `App` ties a loaded [`TracelinkConfig`] to the directory its relative
//! input paths are resolved against, and loads the declaration files into a
//! [`Snapshot`].
//!
//! # Example
//!
//! ```no_run
//! use tracelink::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     let (snapshot, report) = app.load_snapshot(&[]).await?;
//!     println!("{} artifacts, {} rejected", snapshot.artifacts().len(), report.rejections.len());
//!     Ok(())
//! }
//! ```

use crate::config::{CONFIG_FILE_NAME, TracelinkConfig, find_config_root};
use crate::error::{ConfigError, Result};
use crate::ingest::{self, IngestReport};
use crate::store::Snapshot;
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
#[derive(Debug, Clone)]
pub struct App {
    /// Directory relative inputs are resolved against
    root_dir: PathBuf,

    /// Config file the settings came from, if any
    config_path: Option<PathBuf>,

    /// Loaded settings
    config: TracelinkConfig,
}

impl App {
    /// Create an App by searching up from `working_dir` for `tracelink.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No config file is found in the directory tree
    /// - The config file cannot be read or is invalid
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_config_root(working_dir)
            .ok_or_else(|| ConfigError::NotFound(working_dir.to_path_buf()))?;
        Self::from_config_file(&root_dir.join(CONFIG_FILE_NAME)).await
    }

    /// Create an App from an explicit config file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or invalid.
    pub async fn from_config_file(config_path: &Path) -> Result<Self> {
        if !config_path.is_file() {
            return Err(ConfigError::NotFound(config_path.to_path_buf()).into());
        }
        let config = TracelinkConfig::load(config_path).await?;
        let root_dir = config_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Ok(Self {
            root_dir,
            config_path: Some(config_path.to_path_buf()),
            config,
        })
    }

    /// Create an App with default settings rooted at `working_dir`.
    ///
    /// Used when input files are given on the command line and no config
    /// file exists.
    pub fn with_defaults(working_dir: &Path) -> Self {
        Self {
            root_dir: working_dir.to_path_buf(),
            config_path: None,
            config: TracelinkConfig::default(),
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &TracelinkConfig {
        &self.config
    }

    /// Get the config file path, if the settings came from one.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Get the directory relative input paths are resolved against.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// The declaration files to load.
    ///
    /// Non-empty `overrides` replace the configured inputs. Overrides are
    /// taken as given (relative to the process's working directory).
    pub fn inputs(&self, overrides: &[PathBuf]) -> Vec<PathBuf> {
        if overrides.is_empty() {
            self.config.resolve_inputs(&self.root_dir)
        } else {
            overrides.to_vec()
        }
    }

    /// Load the declaration files into a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if any input file cannot be read.
    pub async fn load_snapshot(&self, overrides: &[PathBuf]) -> Result<(Snapshot, IngestReport)> {
        let inputs = self.inputs(overrides);
        tracing::debug!(inputs = inputs.len(), root = %self.root_dir.display(), "Loading inputs");
        ingest::load_snapshot(&inputs, &self.config.prefix_rules).await
    }
}
