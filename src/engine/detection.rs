// ABOUTME: Engine socket detection on the local system.
// ABOUTME: Checks Podman sockets first, then Docker, unless configured explicitly.

use super::types::{RuntimeInfo, RuntimeType};
use crate::config::EngineConfig;
use std::path::Path;

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Error during engine detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container engine found (checked Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("configured socket does not exist: {0}")]
    SocketMissing(String),
}

/// Detect the container engine on the local system.
///
/// Detection order:
/// 1. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 2. Rootful Podman socket (`/run/podman/podman.sock`)
/// 3. Docker socket (`/var/run/docker.sock`)
pub fn detect_local() -> Result<RuntimeInfo, DetectionError> {
    let rootless = get_uid().map(|uid| format!("/run/user/{}/podman/podman.sock", uid));

    let candidates = rootless
        .into_iter()
        .map(|path| (RuntimeType::Podman, path))
        .chain([
            (RuntimeType::Podman, ROOTFUL_PODMAN.to_string()),
            (RuntimeType::Docker, DOCKER_SOCKET.to_string()),
        ]);

    for (runtime_type, socket_path) in candidates {
        if Path::new(&socket_path).exists() {
            tracing::debug!(%runtime_type, %socket_path, "found engine socket");
            return Ok(RuntimeInfo {
                runtime_type,
                socket_path,
            });
        }
    }

    Err(DetectionError::NoRuntimeFound)
}

/// Resolve the engine to connect to, honouring explicit configuration.
///
/// An explicit socket is used as-is (its runtime defaults to Docker); an
/// explicit runtime without a socket uses that runtime's default socket.
pub fn resolve(config: &EngineConfig) -> Result<RuntimeInfo, DetectionError> {
    match (&config.runtime, &config.socket) {
        (runtime, Some(socket)) => {
            if !Path::new(socket).exists() {
                return Err(DetectionError::SocketMissing(socket.clone()));
            }
            Ok(RuntimeInfo {
                runtime_type: runtime.unwrap_or(RuntimeType::Docker),
                socket_path: socket.clone(),
            })
        }
        (Some(runtime), None) => Ok(RuntimeInfo {
            runtime_type: *runtime,
            socket_path: default_socket_path(*runtime),
        }),
        (None, None) => detect_local(),
    }
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn default_socket_path(runtime: RuntimeType) -> String {
    match runtime {
        RuntimeType::Docker => DOCKER_SOCKET.to_string(),
        RuntimeType::Podman => ROOTFUL_PODMAN.to_string(),
    }
}
