//! Estimator configuration for marksrank
//!
//! Configuration lives in `config.toml`. Lookup order: an explicit path,
//! then `$MARKSRANK_CONFIG_DIR/config.toml`, then the platform config
//! directory (`~/.config/marksrank/config.toml` on Linux). A missing file
//! means defaults.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RankError, Result};

pub use types::{EstimatorConfig, TableNames, CONFIG_FORMAT_VERSION};

const CONFIG_DIR: &str = "marksrank";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "MARKSRANK_CONFIG_DIR";

/// Check that a table name is a plain SQL identifier
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(RankError::invalid_value("table name", name))
    }
}

impl EstimatorConfig {
    /// Default location of the config file, if one can be determined
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            return Some(PathBuf::from(env_dir).join(CONFIG_FILE));
        }
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RankError::Other(format!(
                "failed to read config from {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: EstimatorConfig = toml::from_str(&content)?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(RankError::invalid_value(
                "config version",
                format!("{} (supported: {})", config.version, CONFIG_FORMAT_VERSION),
            ));
        }

        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or fall back to discovery and defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "load_config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RankError::Other(format!("failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject table names that cannot be used as SQL identifiers
    pub fn validate(&self) -> Result<()> {
        for name in self.tables.all() {
            validate_table_name(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::InterpolationMode;
    use crate::reference::ReferenceTable;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = EstimatorConfig::default();
        assert_eq!(config.version, CONFIG_FORMAT_VERSION);
        assert_eq!(config.interpolation, InterpolationMode::Offset);
        assert!(config.jitter_seed.is_none());
        assert_eq!(
            config.tables.name_for(ReferenceTable::PhysicsChemistry),
            "pc_marks_vs_percentile"
        );
        assert_eq!(config.tables.difficulty, "hb_difficulty_of_exam");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = EstimatorConfig {
            jitter_seed: Some(7),
            interpolation: InterpolationMode::Linear,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = EstimatorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tables]\nmath = \"maths_2025\"\n").unwrap();

        let loaded = EstimatorConfig::load(&path).unwrap();
        assert_eq!(loaded.tables.math, "maths_2025");
        assert_eq!(loaded.tables.aggregate, "marks_vs_percentile");
        assert_eq!(loaded.version, CONFIG_FORMAT_VERSION);
    }

    #[test]
    fn test_rejects_unsafe_table_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tables]\nmath = \"math; DROP TABLE x\"\n").unwrap();

        assert!(matches!(
            EstimatorConfig::load(&path),
            Err(RankError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rejects_newer_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "version = 99\n").unwrap();

        assert!(EstimatorConfig::load(&path).is_err());
    }

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("marks_vs_percentile").is_ok());
        assert!(validate_table_name("_t2").is_ok());
        assert!(validate_table_name("2t").is_err());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("a\"b").is_err());
    }
}
