// ABOUTME: Cluster orchestrator adapter over the Kubernetes API.
// ABOUTME: Node, pod, deployment and service operations.

mod kube;
mod projection;
mod traits;

pub use self::kube::{ClusterConnectError, KubeCluster};
pub use traits::{ClusterError, ClusterOps, Document};
