// ABOUTME: Container operations trait for the container engine.
// ABOUTME: List, run, start, stop, restart, rename, remove and commit containers.

use super::shared_types::{CommitConfig, RunConfig};
use crate::model::Container;
use crate::sealed::Sealed;
use crate::types::{ContainerId, ImageId};
use async_trait::async_trait;
use std::time::Duration;

/// Container lifecycle operations.
#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// List all containers, including stopped ones.
    async fn list_containers(&self) -> Result<Vec<Container>, ContainerError>;

    /// Create a container and start it detached.
    async fn run_container(&self, config: &RunConfig) -> Result<ContainerId, ContainerError>;

    /// Start a created or stopped container.
    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Stop a running container. Stopping a stopped container succeeds.
    async fn stop_container(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError>;

    /// Restart a container.
    async fn restart_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Rename a container.
    async fn rename_container(
        &self,
        id: &ContainerId,
        new_name: &str,
    ) -> Result<(), ContainerError>;

    /// Remove a stopped container. Never forced.
    async fn remove_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Snapshot a container's filesystem into a new image.
    async fn commit_container(
        &self,
        id: &ContainerId,
        config: &CommitConfig,
    ) -> Result<ImageId, ContainerError>;
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("container already exists: {0}")]
    AlreadyExists(String),

    #[error("container already running: {0}")]
    AlreadyRunning(String),

    #[error("port already allocated: {0}")]
    PortConflict(String),

    #[error("container in use: {0}")]
    InUse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("engine unreachable: {0}")]
    Unreachable(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
