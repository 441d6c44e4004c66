// ABOUTME: In-memory engine and cluster backends for unit tests.
// ABOUTME: Mimic the adapters' error behaviour without a socket or API server.

use crate::cluster::{ClusterError, ClusterOps, Document};
use crate::engine::{
    BuildContext, CommitConfig, ContainerError, ContainerOps, EngineProbe, ImageError, ImageOps,
    PortPair, ProbeError, RunConfig,
};
use crate::model::{
    ClusterInfo, Container, ContainerImage, ContainerStatus, Deployment, EngineInfo, Image, Node,
    ObjectRef, Pod, Service,
};
use crate::sealed::Sealed;
use crate::types::{ContainerId, ImageId, ImageRef, Namespace, ObjectName};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct FakeContainer {
    id: String,
    name: String,
    image_id: String,
    status: ContainerStatus,
    ports: Vec<PortPair>,
}

#[derive(Default)]
struct EngineState {
    images: Vec<Image>,
    containers: Vec<FakeContainer>,
    next_id: usize,
}

impl EngineState {
    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:064x}", self.next_id)
    }

    fn add_image(&mut self, tag: Option<String>) -> ImageId {
        let id = ImageId::new(format!("sha256:{}", self.fresh_id()));
        if let Some(tag) = &tag {
            for image in &mut self.images {
                image.tags.retain(|t| t != tag);
            }
        }
        self.images.push(Image {
            short_id: id.short(),
            tags: tag.into_iter().collect(),
            labels: HashMap::new(),
            attrs: serde_json::Value::Null,
            id: id.clone(),
        });
        id
    }

    fn find_image(&self, reference: &str) -> Option<&Image> {
        let tagged = if reference.contains(':') || reference.contains('@') {
            reference.to_string()
        } else {
            format!("{}:latest", reference)
        };
        self.images
            .iter()
            .find(|i| i.id.as_str() == reference || i.tags.contains(&tagged))
    }

    fn container(&mut self, id: &ContainerId) -> Result<&mut FakeContainer, ContainerError> {
        self.containers
            .iter_mut()
            .find(|c| c.id == id.as_str() || c.name == id.as_str())
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))
    }
}

/// Engine double holding images and containers in memory.
///
/// `pull_image` treats `missing/*` as absent from the registry and
/// `private/*` as rejecting credentials. Builds fail when the Dockerfile
/// contains `RUN false`.
#[derive(Default)]
pub struct FakeEngine {
    state: Mutex<EngineState>,
    down: bool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose socket does not answer.
    pub fn unreachable() -> Self {
        FakeEngine {
            down: true,
            ..Default::default()
        }
    }

    pub fn with_image(self, tag: &str) -> Self {
        self.lock().add_image(Some(tag.to_string()));
        self
    }

    /// Port pairs the container was created with, in request order.
    pub fn published_ports(&self, id: &ContainerId) -> Vec<PortPair> {
        self.lock()
            .containers
            .iter()
            .find(|c| c.id == id.as_str())
            .map(|c| c.ports.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.state.lock().unwrap()
    }

    fn check_up(&self) -> Result<(), String> {
        if self.down {
            Err("connection refused".to_string())
        } else {
            Ok(())
        }
    }
}

impl Sealed for FakeEngine {}

#[async_trait]
impl EngineProbe for FakeEngine {
    async fn info(&self) -> Result<EngineInfo, ProbeError> {
        self.check_up().map_err(ProbeError::ConnectionFailed)?;
        Ok(EngineInfo {
            name: "fake".to_string(),
            version: "1.0.0".to_string(),
            api_version: "1.43".to_string(),
            os: "linux".to_string(),
            arch: "amd64".to_string(),
        })
    }

    async fn ping(&self) -> Result<(), ProbeError> {
        self.check_up().map_err(ProbeError::ConnectionFailed)
    }
}

#[async_trait]
impl ImageOps for FakeEngine {
    async fn list_images(&self) -> Result<Vec<Image>, ImageError> {
        self.check_up().map_err(ImageError::Unreachable)?;
        Ok(self.lock().images.clone())
    }

    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        self.check_up().map_err(ImageError::Unreachable)?;
        let name = reference.repository();
        if name.starts_with("missing/") {
            return Err(ImageError::NotFound(reference.to_string()));
        }
        if name.starts_with("private/") {
            return Err(ImageError::AuthenticationFailed(reference.to_string()));
        }
        self.lock().add_image(Some(reference.to_string()));
        Ok(())
    }

    async fn remove_image(&self, image: &str) -> Result<(), ImageError> {
        self.check_up().map_err(ImageError::Unreachable)?;
        let mut state = self.lock();
        let id = state
            .find_image(image)
            .map(|i| i.id.to_string())
            .ok_or_else(|| ImageError::NotFound(image.to_string()))?;
        if state.containers.iter().any(|c| c.image_id == id) {
            return Err(ImageError::InUse(image.to_string()));
        }
        state.images.retain(|i| i.id.as_str() != id);
        Ok(())
    }

    async fn build_image(
        &self,
        context: BuildContext,
        tag: &ImageRef,
    ) -> Result<ImageId, ImageError> {
        self.check_up().map_err(ImageError::Unreachable)?;
        let bytes = match context {
            BuildContext::Dockerfile(b) | BuildContext::Archive(b) => b,
        };
        if bytes.is_empty() {
            return Err(ImageError::InvalidContext("empty build context".to_string()));
        }
        let text = String::from_utf8_lossy(&bytes);
        if text.contains("RUN false") {
            return Err(ImageError::BuildFailed {
                reason: "The command '/bin/sh -c false' returned a non-zero code: 1".to_string(),
                log: text.lines().map(str::to_string).collect(),
            });
        }
        Ok(self.lock().add_image(Some(tag.to_string())))
    }
}

#[async_trait]
impl ContainerOps for FakeEngine {
    async fn list_containers(&self) -> Result<Vec<Container>, ContainerError> {
        self.check_up().map_err(ContainerError::Unreachable)?;
        let state = self.lock();
        Ok(state
            .containers
            .iter()
            .map(|c| {
                let id = ContainerId::new(c.id.clone());
                let tags = state
                    .images
                    .iter()
                    .find(|i| i.id.as_str() == c.image_id)
                    .map(|i| i.tags.clone())
                    .unwrap_or_default();
                Container {
                    short_id: id.short(),
                    id,
                    name: c.name.clone(),
                    status: c.status,
                    image: ContainerImage {
                        id: ImageId::new(c.image_id.clone()),
                        tags,
                    },
                    labels: HashMap::new(),
                }
            })
            .collect())
    }

    async fn run_container(&self, config: &RunConfig) -> Result<ContainerId, ContainerError> {
        self.check_up().map_err(ContainerError::Unreachable)?;
        let mut state = self.lock();

        let image_id = state
            .find_image(&config.image)
            .map(|i| i.id.to_string())
            .ok_or_else(|| ContainerError::ImageNotFound(config.image.clone()))?;

        let id = state.fresh_id();
        let name = config.name.clone().unwrap_or_else(|| format!("fake_{}", &id[56..]));
        if state.containers.iter().any(|c| c.name == name) {
            return Err(ContainerError::AlreadyExists(name));
        }

        let taken = state
            .containers
            .iter()
            .filter(|c| c.status == ContainerStatus::Running)
            .flat_map(|c| c.ports.iter().map(|p| p.host_port))
            .find(|port| config.ports.iter().any(|p| p.host_port == *port));
        if let Some(port) = taken {
            return Err(ContainerError::PortConflict(format!(
                "port {} is already allocated",
                port
            )));
        }

        state.containers.push(FakeContainer {
            id: id.clone(),
            name,
            image_id,
            status: ContainerStatus::Running,
            ports: config.ports.clone(),
        });
        Ok(ContainerId::new(id))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.check_up().map_err(ContainerError::Unreachable)?;
        let mut state = self.lock();
        let container = state.container(id)?;
        if container.status == ContainerStatus::Running {
            return Err(ContainerError::AlreadyRunning(id.to_string()));
        }
        container.status = ContainerStatus::Running;
        Ok(())
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        _timeout: Duration,
    ) -> Result<(), ContainerError> {
        self.check_up().map_err(ContainerError::Unreachable)?;
        self.lock().container(id)?.status = ContainerStatus::Exited;
        Ok(())
    }

    async fn restart_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.check_up().map_err(ContainerError::Unreachable)?;
        self.lock().container(id)?.status = ContainerStatus::Running;
        Ok(())
    }

    async fn rename_container(
        &self,
        id: &ContainerId,
        new_name: &str,
    ) -> Result<(), ContainerError> {
        self.check_up().map_err(ContainerError::Unreachable)?;
        let mut state = self.lock();
        if state.containers.iter().any(|c| c.name == new_name) {
            return Err(ContainerError::AlreadyExists(new_name.to_string()));
        }
        state.container(id)?.name = new_name.to_string();
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.check_up().map_err(ContainerError::Unreachable)?;
        let mut state = self.lock();
        let container = state.container(id)?;
        if container.status == ContainerStatus::Running {
            return Err(ContainerError::InUse(format!("{} is running", id)));
        }
        let target = container.id.clone();
        state.containers.retain(|c| c.id != target);
        Ok(())
    }

    async fn commit_container(
        &self,
        id: &ContainerId,
        config: &CommitConfig,
    ) -> Result<ImageId, ContainerError> {
        self.check_up().map_err(ContainerError::Unreachable)?;
        let mut state = self.lock();
        state.container(id)?;
        let tag = format!("{}:{}", config.repository, config.tag.as_deref().unwrap_or("latest"));
        Ok(state.add_image(Some(tag)))
    }
}

/// Cluster double storing created deployment and service names per namespace.
///
/// Listing pods sleeps briefly and records how many listings overlapped.
#[derive(Default)]
pub struct FakeCluster {
    deployments: Mutex<Vec<ObjectRef>>,
    services: Mutex<Vec<ObjectRef>>,
    pods: Vec<Pod>,
    down: bool,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        FakeCluster {
            down: true,
            ..Default::default()
        }
    }

    pub fn with_pod(mut self, namespace: &str, name: &str) -> Self {
        self.pods.push(Pod {
            namespace: namespace.to_string(),
            name: name.to_string(),
            creation_timestamp: None,
            pod_ip: None,
            node_name: None,
            container_statuses: Vec::new(),
        });
        self
    }

    /// Most `list_pods` calls observed running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn check_up(&self) -> Result<(), ClusterError> {
        if self.down {
            Err(ClusterError::Unreachable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn create(
        store: &Mutex<Vec<ObjectRef>>,
        kind: &str,
        namespace: &Namespace,
        spec: &Document,
    ) -> Result<ObjectRef, ClusterError> {
        let name = spec["metadata"]["name"].as_str().ok_or_else(|| {
            ClusterError::InvalidSpec(format!("{}.metadata.name: Required value", kind))
        })?;
        let object = ObjectRef {
            name: name.to_string(),
            namespace: namespace.to_string(),
        };
        let mut store = store.lock().unwrap();
        if store.contains(&object) {
            return Err(ClusterError::AlreadyExists(format!(
                "{} {}/{}",
                kind, namespace, name
            )));
        }
        store.push(object.clone());
        Ok(object)
    }

    fn delete(
        store: &Mutex<Vec<ObjectRef>>,
        kind: &str,
        name: &ObjectName,
        namespace: &Namespace,
    ) -> Result<(), ClusterError> {
        let mut store = store.lock().unwrap();
        let before = store.len();
        store.retain(|o| !(o.name == name.as_str() && o.namespace == namespace.as_str()));
        if store.len() == before {
            return Err(ClusterError::NotFound(format!("{} {}/{}", kind, namespace, name)));
        }
        Ok(())
    }
}

impl Sealed for FakeCluster {}

#[async_trait]
impl ClusterOps for FakeCluster {
    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        self.check_up()?;
        Ok(vec![Node {
            kind: "Node".to_string(),
            name: "fake-node".to_string(),
            namespace: String::new(),
            creation_timestamp: None,
            allocatable: Default::default(),
            phase: None,
        }])
    }

    async fn list_pods(&self) -> Result<Vec<Pod>, ClusterError> {
        self.check_up()?;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.pods.clone())
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>, ClusterError> {
        self.check_up()?;
        Ok(self
            .deployments
            .lock()
            .unwrap()
            .iter()
            .map(|o| Deployment {
                name: o.name.clone(),
                namespace: o.namespace.clone(),
                creation_timestamp: None,
                available_replicas: None,
                replicas: Some(1),
            })
            .collect())
    }

    async fn create_deployment(
        &self,
        namespace: &Namespace,
        spec: &Document,
    ) -> Result<ObjectRef, ClusterError> {
        self.check_up()?;
        Self::create(&self.deployments, "Deployment", namespace, spec)
    }

    async fn delete_deployment(
        &self,
        name: &ObjectName,
        namespace: &Namespace,
    ) -> Result<(), ClusterError> {
        self.check_up()?;
        Self::delete(&self.deployments, "Deployment", name, namespace)
    }

    async fn list_services(&self) -> Result<Vec<Service>, ClusterError> {
        self.check_up()?;
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .map(|o| Service {
                name: o.name.clone(),
                namespace: o.namespace.clone(),
                creation_timestamp: None,
                cluster_ip: None,
                external_ips: Vec::new(),
                type_: Some("ClusterIP".to_string()),
                ports: Vec::new(),
            })
            .collect())
    }

    async fn create_service(
        &self,
        namespace: &Namespace,
        spec: &Document,
    ) -> Result<ObjectRef, ClusterError> {
        self.check_up()?;
        Self::create(&self.services, "Service", namespace, spec)
    }

    async fn delete_service(
        &self,
        name: &ObjectName,
        namespace: &Namespace,
    ) -> Result<(), ClusterError> {
        self.check_up()?;
        Self::delete(&self.services, "Service", name, namespace)
    }

    async fn version(&self) -> Result<ClusterInfo, ClusterError> {
        self.check_up()?;
        Ok(ClusterInfo {
            git_version: "v1.30.0".to_string(),
            platform: "linux/amd64".to_string(),
        })
    }
}
