//! Configuration schema (colcontract.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const CONFIG_FILE_NAME: &str = "colcontract.toml";

/// Default location of the dbt manifest
pub const DEFAULT_MANIFEST: &str = "target/manifest.json";

/// Default location of the dbt catalog
pub const DEFAULT_CATALOG: &str = "target/catalog.json";

/// Rule defaults, overridden by command line arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Regex pattern column names must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Contract data types (comma or pipe delimited)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtype: Option<String>,

    /// Column names exempt from the pattern test
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_name_ignore: Option<String>,

    /// Only check that pattern-named columns have a contract type
    #[serde(default)]
    pub pattern_flg: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to manifest.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,

    /// Path to catalog.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Rule defaults
    #[serde(default)]
    pub rule: RuleConfig,

    /// Directory relative paths in the config are resolved against
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        Ok(())
    }

    /// Manifest path, resolved against the project root
    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(self.manifest.as_deref().unwrap_or(Path::new(DEFAULT_MANIFEST)))
    }

    /// Catalog path, resolved against the project root
    pub fn catalog_path(&self) -> PathBuf {
        self.resolve(self.catalog.as_deref().unwrap_or(Path::new(DEFAULT_CATALOG)))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(String, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.manifest_path(), PathBuf::from(DEFAULT_MANIFEST));
        assert_eq!(config.catalog_path(), PathBuf::from(DEFAULT_CATALOG));
        assert!(!config.rule.pattern_flg);
    }

    #[test]
    fn parse_rule_section() {
        let config = Config::from_toml(
            r#"
            catalog = "artifacts/catalog.json"

            [rule]
            pattern = "^dt_"
            dtype = "date|timestamp"
            col_name_ignore = "dt_legacy"
            pattern_flg = true
            "#,
        )
        .unwrap();

        assert_eq!(config.rule.pattern.as_deref(), Some("^dt_"));
        assert_eq!(config.rule.dtype.as_deref(), Some("date|timestamp"));
        assert_eq!(config.rule.col_name_ignore.as_deref(), Some("dt_legacy"));
        assert!(config.rule.pattern_flg);
        assert_eq!(config.catalog_path(), PathBuf::from("artifacts/catalog.json"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml("[rule\npattern = "),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn paths_resolve_against_config_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "manifest = \"build/manifest.json\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.manifest_path(), dir.path().join("build/manifest.json"));
        assert_eq!(config.catalog_path(), dir.path().join(DEFAULT_CATALOG));
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut config = Config::default();
        config.rule.pattern = Some("^is_".to_string());
        config.rule.dtype = Some("boolean".to_string());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        config.save_to_file(&path).unwrap();

        let parsed = Config::from_file(&path).unwrap();
        assert_eq!(config.rule, parsed.rule);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Config::from_file(Path::new("does/not/exist.toml")),
            Err(ConfigError::IoError(_, _))
        ));
    }
}
