//! Loads `DeployConfig` from a YAML file on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::DeployConfig;
use crate::domain::error::ConfigError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CAMPUSCTL_CONFIG";
/// Config file looked up in the working directory when nothing else is set.
pub const DEFAULT_CONFIG_FILE: &str = "campusctl.yaml";

/// YAML-backed configuration source.
///
/// Resolution order: explicit path, then `$CAMPUSCTL_CONFIG`, then
/// `./campusctl.yaml`. Only the implicit default may be absent.
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// The path that will be read and whether it was named explicitly.
    #[must_use]
    pub fn path(&self) -> (PathBuf, bool) {
        if let Some(path) = &self.explicit {
            return (path.clone(), true);
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            if !val.is_empty() {
                return (PathBuf::from(val), true);
            }
        }
        (PathBuf::from(DEFAULT_CONFIG_FILE), false)
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, the file
    /// cannot be read or parsed, or validation fails.
    pub fn load(&self) -> Result<DeployConfig> {
        let (path, explicit) = self.path();
        if !path.exists() {
            if explicit {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            return Ok(DeployConfig::default());
        }
        let config = read(&path)?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}

fn read(path: &Path) -> Result<DeployConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}
