//! Configuration loading from `.phpantom.toml`.
//!
//! Search order:
//!   1. `.phpantom.toml` in the project root
//!   2. `phpantom/config.toml` in the user's config directory
//!   3. Built-in defaults
//!
//! ## Example
//!
//! ```toml
//! [definition]
//! enabled = true
//! type-definition = false
//!
//! [log]
//! filter = "phpantom_definition=debug"
//! ```
use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::Deserialize;

/// Name of the per-project configuration file.
pub const CONFIG_FILE_NAME: &str = ".phpantom.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub definition: DefinitionConfig,
    pub log: LogConfig,
}

/// Toggles for definition requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DefinitionConfig {
    /// Answer "go to definition" at all.
    pub enabled: bool,
    /// Answer "go to type definition".  Ignored when `enabled` is false.
    pub type_definition: bool,
}

impl Default for DefinitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            type_definition: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// An `EnvFilter` directive.  `RUST_LOG` takes precedence.
    pub filter: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load the configuration for a project rooted at `root`.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let project = root.join(CONFIG_FILE_NAME);
        if project.is_file() {
            return Self::from_file(&project);
        }

        if let Some(user) = Self::user_config_path()
            && user.is_file()
        {
            return Self::from_file(&user);
        }

        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// `<config dir>/phpantom/config.toml`, when a home directory exists.
    pub fn user_config_path() -> Option<PathBuf> {
        let strategy = etcetera::choose_base_strategy().ok()?;
        Some(strategy.config_dir().join("phpantom").join("config.toml"))
    }
}
