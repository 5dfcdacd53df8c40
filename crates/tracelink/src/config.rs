//! Configuration loading for tracelink.
//!
//! Configuration lives in a single YAML file, `tracelink.yaml`, normally at
//! the root of the documentation tree. Commands locate it by walking up from
//! the working directory.
//!
//! ```yaml
//! inputs:
//!   - trace/artifacts.jsonl
//!   - trace/links.jsonl
//! coverage:
//!   min-percent: 80
//!   overrides:
//!     5: 50
//! prefix-rules:
//!   - prefix: "REQ-"
//!     kind: system_requirement
//! ```

use crate::domain::{ArtifactId, ArtifactKind};
use crate::error::{ConfigError, Result};
use crate::resolver::CoverageThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "tracelink.yaml";

/// Default declaration file written by `init`
pub const DEFAULT_INPUT_FILE: &str = "trace.jsonl";

/// Maximum directory depth to traverse when searching for the config file
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Maps an ID prefix to the kind of artifact it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    /// Case-sensitive ID prefix, e.g. `REQ-`
    pub prefix: String,

    /// Kind assigned to matching IDs
    pub kind: ArtifactKind,
}

impl PrefixRule {
    /// Create a new rule
    pub fn new(prefix: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            prefix: prefix.into(),
            kind,
        }
    }
}

/// The built-in ID conventions, used when the config does not list its own.
pub fn default_prefix_rules() -> Vec<PrefixRule> {
    vec![
        PrefixRule::new("BN-", ArtifactKind::BusinessNeed),
        PrefixRule::new("BUS-", ArtifactKind::BusinessNeed),
        PrefixRule::new("StR-", ArtifactKind::StakeholderRequirement),
        PrefixRule::new("STR-", ArtifactKind::StakeholderRequirement),
        PrefixRule::new("REQ-", ArtifactKind::SystemRequirement),
        PrefixRule::new("ADR-", ArtifactKind::DesignElement),
        PrefixRule::new("ARC-", ArtifactKind::DesignElement),
        PrefixRule::new("DES-", ArtifactKind::DesignElement),
        PrefixRule::new("CODE-", ArtifactKind::CodeUnit),
        PrefixRule::new("SRC-", ArtifactKind::CodeUnit),
        PrefixRule::new("TEST-", ArtifactKind::TestCase),
        PrefixRule::new("TC-", ArtifactKind::TestCase),
    ]
}

/// Infer an artifact's kind from its ID. The first matching rule wins.
pub fn infer_kind(rules: &[PrefixRule], id: &ArtifactId) -> Option<ArtifactKind> {
    rules
        .iter()
        .find(|rule| id.as_str().starts_with(&rule.prefix))
        .map(|rule| rule.kind)
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TracelinkConfig {
    /// Declaration files, relative to the config file's directory
    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    /// Coverage gate used by `check`
    #[serde(default)]
    pub coverage: CoverageThresholds,

    /// Ordered ID prefix rules for declarations without a kind
    #[serde(default = "default_prefix_rules")]
    pub prefix_rules: Vec<PrefixRule>,
}

impl Default for TracelinkConfig {
    fn default() -> Self {
        Self {
            inputs: vec![PathBuf::from(DEFAULT_INPUT_FILE)],
            coverage: CoverageThresholds::default(),
            prefix_rules: default_prefix_rules(),
        }
    }
}

impl TracelinkConfig {
    /// Load and validate configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), inputs = config.inputs.len(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Yaml(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for percentages above 100, override
    /// keys outside 1-5, or empty prefixes.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.coverage.min_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "coverage.min-percent must be at most 100, got {}",
                self.coverage.min_percent
            )));
        }
        for (&upper, &min) in &self.coverage.overrides {
            if !(1..=5).contains(&upper) {
                return Err(ConfigError::Invalid(format!(
                    "coverage override key must be a level between 1 and 5, got {upper}"
                )));
            }
            if min > 100 {
                return Err(ConfigError::Invalid(format!(
                    "coverage override for level {upper} must be at most 100, got {min}"
                )));
            }
        }
        if let Some(rule) = self.prefix_rules.iter().find(|r| r.prefix.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "prefix rule for {} has an empty prefix",
                rule.kind
            )));
        }
        Ok(())
    }

    /// Input paths resolved against `base_dir`.
    pub fn resolve_inputs(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.inputs.iter().map(|p| base_dir.join(p)).collect()
    }
}

/// Find the directory holding `tracelink.yaml` by searching up the tree.
///
/// Returns `None` if no config is found before the filesystem root or the
/// traversal depth limit.
pub fn find_config_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
