//! TOML configuration file for the frontdesk engine.
//!
//! Loaded from `$XDG_CONFIG_HOME/frontdesk/config.toml` (see [`crate::paths`]);
//! a missing file means defaults. CLI flags override file values.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::EngineConfig;
use crate::matcher;

/// Errors from config loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(frontdesk::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {path}")]
    #[diagnostic(
        code(frontdesk::config::parse),
        help("The file must be valid TOML with keys `data_dir` and `similarity_threshold`.")
    )]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// On-disk configuration. All fields optional; absent fields use defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontdeskConfig {
    /// Data directory override. Absent means the XDG data dir.
    pub data_dir: Option<PathBuf>,
    /// Fuzzy-match threshold override. Absent means 0.80.
    pub similarity_threshold: Option<f64>,
}

impl FrontdeskConfig {
    /// Load from a TOML file. A missing file yields the default config.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Fold file values and a fallback data dir into an [`EngineConfig`].
    pub fn engine_config(&self, fallback_data_dir: Option<PathBuf>) -> EngineConfig {
        EngineConfig {
            data_dir: self.data_dir.clone().or(fallback_data_dir),
            similarity_threshold: self
                .similarity_threshold
                .unwrap_or(matcher::SIMILARITY_THRESHOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = FrontdeskConfig::load(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(config.data_dir.is_none());
        assert!(config.similarity_threshold.is_none());

        let engine = config.engine_config(None);
        assert_eq!(engine.similarity_threshold, matcher::SIMILARITY_THRESHOLD);
        assert!(engine.data_dir.is_none());
    }

    #[test]
    fn parses_and_merges_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/var/lib/frontdesk\"\nsimilarity_threshold = 0.9\n",
        )
        .unwrap();

        let config = FrontdeskConfig::load(&path).unwrap();
        let engine = config.engine_config(Some(PathBuf::from("/tmp/fallback")));
        assert_eq!(engine.data_dir, Some(PathBuf::from("/var/lib/frontdesk")));
        assert_eq!(engine.similarity_threshold, 0.9);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "treshold = 0.9\n").unwrap();
        assert!(matches!(
            FrontdeskConfig::load(&path).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }
}
