// ABOUTME: Uniform views of container engine resources.
// ABOUTME: Image and Container records returned to every caller.

use crate::types::{ContainerId, ImageId};
use serde::Serialize;
use std::collections::HashMap;

/// A local image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub id: ImageId,
    pub short_id: String,
    pub tags: Vec<String>,
    pub labels: HashMap<String, String>,
    /// The engine's own record for the image, passed through untouched.
    pub attrs: serde_json::Value,
}

/// A container known to the engine, running or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub id: ContainerId,
    pub short_id: String,
    pub name: String,
    pub status: ContainerStatus,
    pub image: ContainerImage,
    pub labels: HashMap<String, String>,
}

/// The image a container was created from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerImage {
    pub id: ImageId,
    pub tags: Vec<String>,
}

/// Container lifecycle status as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

impl ContainerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Created => "created",
            ContainerStatus::Running => "running",
            ContainerStatus::Paused => "paused",
            ContainerStatus::Restarting => "restarting",
            ContainerStatus::Removing => "removing",
            ContainerStatus::Exited => "exited",
            ContainerStatus::Dead => "dead",
            ContainerStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine identity, reported by the connectivity probe.
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    /// Runtime name (e.g., "docker", "podman").
    pub name: String,
    pub version: String,
    pub api_version: String,
    pub os: String,
    pub arch: String,
}
