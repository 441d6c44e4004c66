// ABOUTME: Uniform views of cluster objects.
// ABOUTME: Node, Pod, Deployment and Service snapshots taken at call time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: String,
    pub name: String,
    /// Nodes are cluster-scoped; always empty, kept so every cluster view has one.
    pub namespace: String,
    pub creation_timestamp: Option<DateTime<Utc>>,
    /// Resource name to quantity, e.g. `cpu` → `4`, `memory` → `16Gi`.
    pub allocatable: BTreeMap<String, String>,
    pub phase: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pod {
    pub namespace: String,
    pub name: String,
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub pod_ip: Option<String>,
    pub node_name: Option<String>,
    pub container_statuses: Vec<PodContainerStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodContainerStatus {
    pub name: String,
    pub container_id: Option<String>,
    pub image_id: String,
    pub image: String,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deployment {
    pub name: String,
    pub namespace: String,
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub available_replicas: Option<i32>,
    pub replicas: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub name: String,
    pub namespace: String,
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub cluster_ip: Option<String>,
    pub external_ips: Vec<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub ports: Vec<ServicePort>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicePort {
    pub node_port: Option<i32>,
    pub port: i32,
    pub protocol: Option<String>,
}

/// Name and namespace of an object the API server just created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    pub name: String,
    pub namespace: String,
}

/// API server identity, reported by the connectivity probe.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterInfo {
    pub git_version: String,
    pub platform: String,
}
