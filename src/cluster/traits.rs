// ABOUTME: Cluster operations trait and its error type.
// ABOUTME: Cluster-wide listings plus namespaced create and delete.

use crate::model::{ClusterInfo, Deployment, Node, ObjectRef, Pod, Service};
use crate::sealed::Sealed;
use crate::types::{Namespace, ObjectName};
use async_trait::async_trait;

/// An already-deserialized manifest, passed to the API server as-is.
pub type Document = serde_json::Value;

/// Operations against the cluster API server.
///
/// Listings are always cluster-wide; narrowing by namespace is left to the
/// caller.
#[async_trait]
pub trait ClusterOps: Sealed + Send + Sync {
    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError>;

    async fn list_pods(&self) -> Result<Vec<Pod>, ClusterError>;

    async fn list_deployments(&self) -> Result<Vec<Deployment>, ClusterError>;

    /// Submit `spec` as a Deployment in `namespace`.
    async fn create_deployment(
        &self,
        namespace: &Namespace,
        spec: &Document,
    ) -> Result<ObjectRef, ClusterError>;

    async fn delete_deployment(
        &self,
        name: &ObjectName,
        namespace: &Namespace,
    ) -> Result<(), ClusterError>;

    async fn list_services(&self) -> Result<Vec<Service>, ClusterError>;

    /// Submit `spec` as a Service in `namespace`.
    async fn create_service(
        &self,
        namespace: &Namespace,
        spec: &Document,
    ) -> Result<ObjectRef, ClusterError>;

    async fn delete_service(
        &self,
        name: &ObjectName,
        namespace: &Namespace,
    ) -> Result<(), ClusterError>;

    /// API server version, used as a connectivity probe.
    async fn version(&self) -> Result<ClusterInfo, ClusterError>;
}

/// Errors from cluster operations.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("API server unreachable: {0}")]
    Unreachable(String),

    #[error("API server error: {0}")]
    Api(String),
}
