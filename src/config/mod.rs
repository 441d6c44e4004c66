// ABOUTME: Configuration types and parsing for podgate.yml.
// ABOUTME: Handles YAML parsing, file discovery and defaults.

mod cluster;
mod deserialize;
mod engine;
mod init;

pub use cluster::ClusterConfig;
pub use engine::{EngineConfig, PortPairing};
pub use init::init_config;

use crate::error::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "podgate.yml";
pub const CONFIG_FILENAME_ALT: &str = "podgate.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".podgate/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub cluster: ClusterConfig,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: default_listen(),
            engine: EngineConfig::default(),
            cluster: ClusterConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults configuration.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Load `path` when given, otherwise discover a file in `dir`, falling
    /// back to defaults when there is none.
    pub fn resolve(path: Option<&Path>, dir: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::discover(dir) {
                Err(Error::ConfigNotFound(_)) => {
                    tracing::debug!("no configuration file found, using defaults");
                    Ok(Config::default())
                }
                other => other,
            },
        }
    }
}
