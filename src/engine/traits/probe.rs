// ABOUTME: Connectivity probe trait for the container engine.
// ABOUTME: Query engine version and check the socket answers.

use crate::model::EngineInfo;
use crate::sealed::Sealed;
use async_trait::async_trait;

/// Engine metadata operations.
#[async_trait]
pub trait EngineProbe: Sealed + Send + Sync {
    /// Get engine version and platform.
    async fn info(&self) -> Result<EngineInfo, ProbeError>;

    /// Ping the engine to check connectivity.
    async fn ping(&self) -> Result<(), ProbeError>;
}

/// Errors from probe operations.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
