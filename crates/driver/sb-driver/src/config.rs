//! Session configuration loaded from TOML.

use anyhow::{Context, Result};
use sb_coherence::DEFAULT_RECURSION_LIMIT;
use sb_region::DEFAULT_TAINT_LIMIT;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Resource limits for a checking session.
///
/// ```toml
/// recursion-limit = 64
/// taint-limit = 4096
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Maximum nesting of trait bound resolution during coherence checking
    pub recursion_limit: usize,

    /// Maximum size of a taint set during LUB/GLB and subtyping
    pub taint_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            taint_limit: DEFAULT_TAINT_LIMIT,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has unknown keys
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse session configuration")
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session configuration: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse session configuration: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.recursion_limit, 64);
        assert_eq!(config.taint_limit, 4096);
    }

    #[test]
    fn test_partial_config() {
        let config = SessionConfig::from_toml_str("recursion-limit = 8").unwrap();
        assert_eq!(config.recursion_limit, 8);
        assert_eq!(config.taint_limit, DEFAULT_TAINT_LIMIT);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(SessionConfig::from_toml_str("recursion_limit = 8").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "recursion-limit = 16\ntaint-limit = 32").unwrap();

        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(
            config,
            SessionConfig {
                recursion_limit: 16,
                taint_limit: 32,
            }
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = SessionConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
