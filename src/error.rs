// ABOUTME: Application-wide error types for podgate.
// ABOUTME: Covers configuration and start-up failures; request errors live in the gateway.

use crate::cluster::ClusterConnectError;
use crate::engine::{EngineConnectError, EngineConnectErrorKind};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error(transparent)]
    Engine(#[from] EngineConnectError),

    #[error("cluster connection failed: {0}")]
    Cluster(#[from] ClusterConnectError),

    #[error("cluster probe failed: {0}")]
    ClusterProbe(#[from] crate::cluster::ClusterError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// A next step for the operator, when the failure has an obvious one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Engine(e) => match e.kind() {
                EngineConnectErrorKind::NoRuntimeFound => {
                    Some("start Docker or Podman, or set engine.socket in podgate.yml")
                }
                EngineConnectErrorKind::SocketMissing => {
                    Some("engine.socket in podgate.yml points at a path that does not exist")
                }
                EngineConnectErrorKind::ConnectionFailed => {
                    Some("the engine socket exists but did not answer; is the daemon running?")
                }
                EngineConnectErrorKind::RuntimeOperation => None,
            },
            Error::ConfigNotFound(_) => Some("run `podgate init` to write a template"),
            Error::AlreadyExists(_) => Some("pass --force to overwrite"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
