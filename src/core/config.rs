//! Layered configuration
//!
//! Sources, later overriding earlier:
//! 1. built-in defaults
//! 2. the user config file (`~/.config/tsr/config.yaml` on Linux)
//! 3. `.tsr/config.yaml` in the current directory
//! 4. the file named by `TSR_CONFIG`
//!
//! Command-line flags override all of them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::spec::PolicyKind;
use crate::yaml::{parse_yaml_file, YamlError};

/// Environment variable naming an extra config file
pub const CONFIG_ENV: &str = "TSR_CONFIG";

/// Project-local config file, relative to the working directory
pub const LOCAL_CONFIG: &str = ".tsr/config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config {}: {source}", path.display())]
    Load { path: PathBuf, source: YamlError },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace to resolve in when a structure file does not say
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,

    /// Policy used when `--policy` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_policy: Option<PolicyKind>,

    /// Levels walked below the root; unlimited when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_limit: Option<usize>,

    /// Output format used when `--format` is `auto`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// One config file location
#[derive(Debug, Clone)]
struct Source {
    path: PathBuf,
    required: bool,
}

impl Source {
    fn optional(path: PathBuf) -> Self {
        Self {
            path,
            required: false,
        }
    }
}

impl Config {
    /// Load and merge every config source
    ///
    /// The user and local files are skipped when absent; a file named by
    /// `TSR_CONFIG` must exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_sources(&Self::sources())
    }

    fn load_sources(sources: &[Source]) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        for source in sources {
            if source.required || source.path.exists() {
                config.merge(Self::load_file(&source.path)?);
            }
        }
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        parse_yaml_file(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })
    }

    fn sources() -> Vec<Source> {
        let mut sources = Vec::new();
        if let Some(dirs) = directories::ProjectDirs::from("", "", "tsr") {
            sources.push(Source::optional(dirs.config_dir().join("config.yaml")));
        }
        sources.push(Source::optional(PathBuf::from(LOCAL_CONFIG)));
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            sources.push(Source {
                path: PathBuf::from(path),
                required: true,
            });
        }
        sources
    }

    /// Override fields with every value `other` sets
    pub fn merge(&mut self, other: Config) {
        if other.workspace.is_some() {
            self.workspace = other.workspace;
        }
        if other.default_policy.is_some() {
            self.default_policy = other.default_policy;
        }
        if other.depth_limit.is_some() {
            self.depth_limit = other.depth_limit;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
    }
}
