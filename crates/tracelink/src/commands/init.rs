//! Implementation of the `init` command.
//!
//! This module writes a starter `tracelink.yaml` and an empty declaration
//! file into a directory so the analysis commands have something to load.

use crate::config::{CONFIG_FILE_NAME, DEFAULT_INPUT_FILE, TracelinkConfig};
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the written config file
    pub config_file: PathBuf,
    /// Path to the declaration file
    pub input_file: PathBuf,
    /// Whether an existing config was replaced
    pub overwrote_config: bool,
    /// Whether the declaration file was created (an existing one is kept)
    pub created_input: bool,
}

/// Initialize tracelink in the given directory.
///
/// An existing declaration file is never truncated, even with `force`.
///
/// # Errors
///
/// Returns an error if:
/// - `tracelink.yaml` already exists and `force` is false
/// - File system operations fail
pub async fn init(base_dir: &Path, force: bool) -> Result<InitResult> {
    let config_file = base_dir.join(CONFIG_FILE_NAME);
    let overwrote_config = config_file.exists();

    if overwrote_config && !force {
        return Err(ConfigError::AlreadyExists(config_file).into());
    }

    fs::create_dir_all(base_dir).await?;
    TracelinkConfig::default().save(&config_file).await?;

    let input_file = base_dir.join(DEFAULT_INPUT_FILE);
    let created_input = !input_file.exists();
    if created_input {
        fs::write(&input_file, "").await?;
    }

    tracing::info!(
        config = %config_file.display(),
        overwrote_config,
        created_input,
        "Initialized tracelink"
    );

    Ok(InitResult {
        config_file,
        input_file,
        overwrote_config,
        created_input,
    })
}

/// Check if a directory holds a `tracelink.yaml`.
pub fn is_initialized(base_dir: &Path) -> bool {
    base_dir.join(CONFIG_FILE_NAME).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_files() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), false).await.unwrap();

        assert!(result.config_file.exists());
        assert!(result.input_file.exists());
        assert!(result.created_input);
        assert!(!result.overwrote_config);
        assert!(is_initialized(temp_dir.path()));
    }

    #[tokio::test]
    async fn test_init_writes_default_config() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), false).await.unwrap();
        let config = TracelinkConfig::load(&result.config_file).await.unwrap();

        assert_eq!(config, TracelinkConfig::default());
    }

    #[tokio::test]
    async fn test_init_creates_empty_input_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), false).await.unwrap();

        let content = tokio::fs::read_to_string(&result.input_file).await.unwrap();
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn test_init_fails_if_already_initialized() {
        let temp_dir = TempDir::new().unwrap();
        init(temp_dir.path(), false).await.unwrap();

        let result = init(temp_dir.path(), false).await;

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::AlreadyExists(_)))
        ));
    }

    #[tokio::test]
    async fn test_init_force_keeps_declarations() {
        let temp_dir = TempDir::new().unwrap();
        init(temp_dir.path(), false).await.unwrap();
        let input = temp_dir.path().join(DEFAULT_INPUT_FILE);
        std::fs::write(&input, "{\"decl\":\"artifact\",\"id\":\"BN-1\"}\n").unwrap();

        let result = init(temp_dir.path(), true).await.unwrap();

        assert!(result.overwrote_config);
        assert!(!result.created_input);
        let content = std::fs::read_to_string(&input).unwrap();
        assert!(content.contains("BN-1"));
    }

    #[test]
    fn test_is_initialized_false() {
        let temp_dir = TempDir::new().unwrap();

        assert!(!is_initialized(temp_dir.path()));
    }
}
