// ABOUTME: Engine start-up error types with SNAFU pattern.
// ABOUTME: Unifies detection and connection errors for programmatic handling.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::ProbeError;

/// Failure to establish the engine connection at start-up.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EngineConnectError {
    #[snafu(display("engine detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("engine connection failed: {source}"))]
    Connection { source: ProbeError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineConnectErrorKind {
    /// No engine socket found on the system.
    NoRuntimeFound,
    /// Configured socket path does not exist.
    SocketMissing,
    /// Socket exists but the engine did not answer.
    ConnectionFailed,
    /// Engine answered with an error.
    RuntimeOperation,
}

impl EngineConnectError {
    pub fn kind(&self) -> EngineConnectErrorKind {
        match self {
            EngineConnectError::Detection { source } => match source {
                DetectionError::NoRuntimeFound => EngineConnectErrorKind::NoRuntimeFound,
                DetectionError::SocketMissing(_) => EngineConnectErrorKind::SocketMissing,
            },
            EngineConnectError::Connection { source } => match source {
                ProbeError::ConnectionFailed(_) => EngineConnectErrorKind::ConnectionFailed,
                ProbeError::Runtime(_) => EngineConnectErrorKind::RuntimeOperation,
            },
        }
    }
}

impl From<DetectionError> for EngineConnectError {
    fn from(source: DetectionError) -> Self {
        EngineConnectError::Detection { source }
    }
}

impl From<ProbeError> for EngineConnectError {
    fn from(source: ProbeError) -> Self {
        EngineConnectError::Connection { source }
    }
}
