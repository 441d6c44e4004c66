// ABOUTME: Mediation layer between callers and the two backend adapters.
// ABOUTME: Validates typed requests, dispatches one adapter call, normalizes failures.

mod error;
pub mod request;

pub use error::{ErrorKind, OperationError};
pub use request::*;

use crate::cluster::{ClusterOps, Document};
use crate::config::{EngineConfig, PortPairing};
use crate::engine::{CommitConfig, Engine, RunConfig};
use crate::model::{
    ClusterInfo, Container, Deployment, EngineInfo, Image, Node, ObjectRef, Pod, Service,
};
use crate::types::{ContainerId, ImageId, ImageRef, Namespace, ObjectName};
use error::{ClusterSnafu, ContainerSnafu, ImageSnafu, InvalidRequestSnafu};
use serde::Serialize;
use snafu::{ResultExt, ensure};
use std::sync::Arc;
use std::time::Duration;

/// Request-independent settings fixed at start-up.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub port_pairing: PortPairing,
    pub stop_timeout: Duration,
}

impl From<&EngineConfig> for Settings {
    fn from(config: &EngineConfig) -> Self {
        Settings {
            port_pairing: config.port_pairing,
            stop_timeout: config.stop_timeout,
        }
    }
}

/// Outcome of probing one backend.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Probe<T> {
    Up { info: T },
    Down { error: String },
}

impl<T> Probe<T> {
    pub fn is_up(&self) -> bool {
        matches!(self, Probe::Up { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub engine: Probe<EngineInfo>,
    pub cluster: Probe<ClusterInfo>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.engine.is_up() && self.cluster.is_up()
    }
}

type Result<T> = std::result::Result<T, OperationError>;

/// Log a failed operation with its classification.
fn observe<T>(result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::warn!(operation = e.operation(), kind = %e.kind(), "{}", e);
    }
    result
}

fn required(operation: &'static str, field: &str, value: &str) -> Result<()> {
    ensure!(
        !value.trim().is_empty(),
        InvalidRequestSnafu {
            operation,
            message: format!("{} must not be empty", field),
        }
    );
    Ok(())
}

fn image_ref(operation: &'static str, reference: &str) -> Result<ImageRef> {
    ImageRef::parse(reference).map_err(|e| OperationError::InvalidRequest {
        operation,
        message: e.to_string(),
    })
}

fn namespace(operation: &'static str, value: &str) -> Result<Namespace> {
    Namespace::new(value).map_err(|e| OperationError::InvalidRequest {
        operation,
        message: format!("namespace: {}", e),
    })
}

fn object_name(operation: &'static str, value: &str) -> Result<ObjectName> {
    ObjectName::new(value).map_err(|e| OperationError::InvalidRequest {
        operation,
        message: format!("name: {}", e),
    })
}

fn mapping(operation: &'static str, document: &Document) -> Result<()> {
    ensure!(
        document.is_object(),
        InvalidRequestSnafu {
            operation,
            message: "manifest must be a mapping",
        }
    );
    Ok(())
}

/// One engine and one cluster behind a uniform set of operations.
///
/// Holds no per-request state; cloning shares the same backend handles.
pub struct Gateway<E, C> {
    engine: Arc<E>,
    cluster: Arc<C>,
    settings: Settings,
}

impl<E, C> Clone for Gateway<E, C> {
    fn clone(&self) -> Self {
        Gateway {
            engine: Arc::clone(&self.engine),
            cluster: Arc::clone(&self.cluster),
            settings: self.settings,
        }
    }
}

impl<E: Engine, C: ClusterOps> Gateway<E, C> {
    pub fn new(engine: E, cluster: C, settings: Settings) -> Self {
        Gateway {
            engine: Arc::new(engine),
            cluster: Arc::new(cluster),
            settings,
        }
    }

    // =========================================================================
    // Images
    // =========================================================================

    pub async fn list_images(&self) -> Result<Vec<Image>> {
        tracing::debug!(operation = "list_images");
        observe(
            self.engine
                .list_images()
                .await
                .context(ImageSnafu { operation: "list_images" }),
        )
    }

    /// Pull an image; a reference without tag pulls `latest`.
    pub async fn pull_image(&self, request: PullImageRequest) -> Result<()> {
        const OP: &str = "pull_image";
        tracing::debug!(operation = OP, repository = %request.repository);

        observe(async {
            let reference = image_ref(OP, &request.repository)?;
            self.engine
                .pull_image(&reference)
                .await
                .context(ImageSnafu { operation: OP })
        }
        .await)
    }

    pub async fn remove_image(&self, request: RemoveImageRequest) -> Result<()> {
        const OP: &str = "remove_image";
        tracing::debug!(operation = OP, image = %request.image_id);

        observe(async {
            required(OP, "image_id", &request.image_id)?;
            self.engine
                .remove_image(request.image_id.trim())
                .await
                .context(ImageSnafu { operation: OP })
        }
        .await)
    }

    pub async fn build_image(&self, request: BuildImageRequest) -> Result<ImageId> {
        const OP: &str = "build_image";
        tracing::debug!(operation = OP, tag = %request.tag);

        observe(async {
            let tag = image_ref(OP, &request.tag)?;
            self.engine
                .build_image(request.context, &tag)
                .await
                .context(ImageSnafu { operation: OP })
        }
        .await)
    }

    // =========================================================================
    // Containers
    // =========================================================================

    pub async fn list_containers(&self) -> Result<Vec<Container>> {
        tracing::debug!(operation = "list_containers");
        observe(
            self.engine
                .list_containers()
                .await
                .context(ContainerSnafu { operation: "list_containers" }),
        )
    }

    /// Create and start a detached container. Does not wait for readiness.
    pub async fn run_container(&self, request: RunContainerRequest) -> Result<ContainerId> {
        const OP: &str = "run_container";
        tracing::debug!(operation = OP, image = %request.image, name = ?request.name);

        observe(async {
            required(OP, "image", &request.image)?;
            if let Some(name) = &request.name {
                required(OP, "name", name)?;
            }
            let ports = pair_ports(
                &request.container_ports,
                &request.host_ports,
                self.settings.port_pairing,
            )
            .map_err(|message| OperationError::InvalidRequest { operation: OP, message })?;

            let config = RunConfig {
                image: request.image,
                name: request.name,
                command: request.command,
                environment: request.environment,
                ports,
                volumes: request.volumes,
            };

            self.engine
                .run_container(&config)
                .await
                .context(ContainerSnafu { operation: OP })
        }
        .await)
    }

    pub async fn rename_container(&self, request: RenameContainerRequest) -> Result<()> {
        const OP: &str = "rename_container";
        tracing::debug!(operation = OP, container = %request.container_id, name = %request.name);

        observe(async {
            required(OP, "container_id", &request.container_id)?;
            required(OP, "name", &request.name)?;
            self.engine
                .rename_container(&ContainerId::new(request.container_id), &request.name)
                .await
                .context(ContainerSnafu { operation: OP })
        }
        .await)
    }

    pub async fn restart_container(&self, request: ContainerRequest) -> Result<()> {
        const OP: &str = "restart_container";
        tracing::debug!(operation = OP, container = %request.container_id);

        observe(async {
            required(OP, "container_id", &request.container_id)?;
            self.engine
                .restart_container(&ContainerId::new(request.container_id))
                .await
                .context(ContainerSnafu { operation: OP })
        }
        .await)
    }

    pub async fn start_container(&self, request: ContainerRequest) -> Result<()> {
        const OP: &str = "start_container";
        tracing::debug!(operation = OP, container = %request.container_id);

        observe(async {
            required(OP, "container_id", &request.container_id)?;
            self.engine
                .start_container(&ContainerId::new(request.container_id))
                .await
                .context(ContainerSnafu { operation: OP })
        }
        .await)
    }

    /// Stop a container, waiting up to the configured grace period.
    pub async fn stop_container(&self, request: ContainerRequest) -> Result<()> {
        const OP: &str = "stop_container";
        tracing::debug!(operation = OP, container = %request.container_id);

        observe(async {
            required(OP, "container_id", &request.container_id)?;
            self.engine
                .stop_container(
                    &ContainerId::new(request.container_id),
                    self.settings.stop_timeout,
                )
                .await
                .context(ContainerSnafu { operation: OP })
        }
        .await)
    }

    pub async fn remove_container(&self, request: ContainerRequest) -> Result<()> {
        const OP: &str = "remove_container";
        tracing::debug!(operation = OP, container = %request.container_id);

        observe(async {
            required(OP, "container_id", &request.container_id)?;
            self.engine
                .remove_container(&ContainerId::new(request.container_id))
                .await
                .context(ContainerSnafu { operation: OP })
        }
        .await)
    }

    pub async fn commit_container(&self, request: CommitContainerRequest) -> Result<ImageId> {
        const OP: &str = "commit_container";
        tracing::debug!(
            operation = OP,
            container = %request.container_id,
            repository = %request.repository
        );

        observe(async {
            required(OP, "container_id", &request.container_id)?;
            required(OP, "repository", &request.repository)?;

            let config = CommitConfig {
                repository: request.repository,
                tag: request.tag,
                message: request.message,
                author: request.author,
                changes: request.changes,
            };

            self.engine
                .commit_container(&ContainerId::new(request.container_id), &config)
                .await
                .context(ContainerSnafu { operation: OP })
        }
        .await)
    }

    // =========================================================================
    // Cluster
    // =========================================================================

    pub async fn list_nodes(&self) -> Result<Vec<Node>> {
        tracing::debug!(operation = "list_nodes");
        observe(
            self.cluster
                .list_nodes()
                .await
                .context(ClusterSnafu { operation: "list_nodes" }),
        )
    }

    /// Pods across all namespaces.
    pub async fn list_pods(&self) -> Result<Vec<Pod>> {
        tracing::debug!(operation = "list_pods");
        observe(
            self.cluster
                .list_pods()
                .await
                .context(ClusterSnafu { operation: "list_pods" }),
        )
    }

    pub async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        tracing::debug!(operation = "list_deployments");
        observe(
            self.cluster
                .list_deployments()
                .await
                .context(ClusterSnafu { operation: "list_deployments" }),
        )
    }

    pub async fn create_deployment(&self, request: CreateObjectRequest) -> Result<ObjectRef> {
        const OP: &str = "create_deployment";
        tracing::debug!(operation = OP, namespace = %request.namespace);

        observe(async {
            let ns = namespace(OP, &request.namespace)?;
            mapping(OP, &request.document)?;
            self.cluster
                .create_deployment(&ns, &request.document)
                .await
                .context(ClusterSnafu { operation: OP })
        }
        .await)
    }

    pub async fn delete_deployment(&self, request: DeleteObjectRequest) -> Result<()> {
        const OP: &str = "delete_deployment";
        tracing::debug!(operation = OP, name = %request.name, namespace = %request.namespace);

        observe(async {
            let name = object_name(OP, &request.name)?;
            let ns = namespace(OP, &request.namespace)?;
            self.cluster
                .delete_deployment(&name, &ns)
                .await
                .context(ClusterSnafu { operation: OP })
        }
        .await)
    }

    pub async fn list_services(&self) -> Result<Vec<Service>> {
        tracing::debug!(operation = "list_services");
        observe(
            self.cluster
                .list_services()
                .await
                .context(ClusterSnafu { operation: "list_services" }),
        )
    }

    pub async fn create_service(&self, request: CreateObjectRequest) -> Result<ObjectRef> {
        const OP: &str = "create_service";
        tracing::debug!(operation = OP, namespace = %request.namespace);

        observe(async {
            let ns = namespace(OP, &request.namespace)?;
            mapping(OP, &request.document)?;
            self.cluster
                .create_service(&ns, &request.document)
                .await
                .context(ClusterSnafu { operation: OP })
        }
        .await)
    }

    pub async fn delete_service(&self, request: DeleteObjectRequest) -> Result<()> {
        const OP: &str = "delete_service";
        tracing::debug!(operation = OP, name = %request.name, namespace = %request.namespace);

        observe(async {
            let name = object_name(OP, &request.name)?;
            let ns = namespace(OP, &request.namespace)?;
            self.cluster
                .delete_service(&name, &ns)
                .await
                .context(ClusterSnafu { operation: OP })
        }
        .await)
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Probe both backends concurrently. Never fails; a down backend is
    /// reported in the result.
    pub async fn health(&self) -> HealthReport {
        let (engine, cluster) = tokio::join!(self.engine.info(), self.cluster.version());

        HealthReport {
            engine: match engine {
                Ok(info) => Probe::Up { info },
                Err(e) => Probe::Down { error: e.to_string() },
            },
            cluster: match cluster {
                Ok(info) => Probe::Up { info },
                Err(e) => Probe::Down { error: e.to_string() },
            },
        }
    }
}
