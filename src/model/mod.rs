// ABOUTME: Backend-agnostic resource views: the crate's domain model.
// ABOUTME: Only the adapters know how backend objects map onto these records.

mod cluster;
mod engine;

pub use cluster::{
    ClusterInfo, Deployment, Node, ObjectRef, Pod, PodContainerStatus, Service, ServicePort,
};
pub use engine::{Container, ContainerImage, ContainerStatus, EngineInfo, Image};
