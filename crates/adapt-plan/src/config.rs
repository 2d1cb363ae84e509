use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// System-wide configuration file, read when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/adapt/config.toml";

/// Where planned files land on the target system.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PlanConfig {
    pub sources_dir: PathBuf,
    pub preferences_dir: PathBuf,
    pub keyring_dir: PathBuf,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            sources_dir: PathBuf::from("/etc/apt/sources.list.d"),
            preferences_dir: PathBuf::from("/etc/apt/preferences.d"),
            keyring_dir: PathBuf::from("/usr/share/keyrings"),
        }
    }
}

impl PlanConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_PATH`] if it exists, else
    /// the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            tracing::debug!("loading config from {}", path.display());
            return Self::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            tracing::debug!("loading config from {DEFAULT_CONFIG_PATH}");
            return Self::load(default_path);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(PlanConfig::from_toml("").unwrap(), PlanConfig::default());
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config = PlanConfig::from_toml(r#"keyring_dir = "/etc/apt/keyrings""#).unwrap();
        assert_eq!(config.keyring_dir, PathBuf::from("/etc/apt/keyrings"));
        assert_eq!(
            config.sources_dir,
            PathBuf::from("/etc/apt/sources.list.d")
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = PlanConfig::from_toml("cache_dir = \"/tmp\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "sources_dir = \"/tmp/sources\"\n").unwrap();
        let config = PlanConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.sources_dir, PathBuf::from("/tmp/sources"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlanConfig::resolve(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
