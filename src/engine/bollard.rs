// ABOUTME: Bollard-based container engine adapter.
// ABOUTME: Speaks the Docker-compatible API for both Docker and Podman.

use super::projection::{container_view, image_view, tag_index};
use super::types::{RuntimeInfo, RuntimeType};
use crate::engine::traits::{
    BuildContext, CommitConfig, ContainerError, ContainerOps, EngineProbe, ImageError, ImageOps,
    ProbeError, RunConfig,
};
use crate::model::{Container, EngineInfo, Image};
use crate::sealed::Sealed;
use crate::types::{ContainerId, ImageId, ImageRef};
use async_trait::async_trait;
use bollard::Docker;
use bollard::errors::Error as BollardError;
use bollard::models::{ContainerCreateBody, HostConfig, PortBinding};
use bollard::query_parameters::{
    BuildImageOptions, CommitContainerOptions, CreateContainerOptions, CreateImageOptions,
    ListContainersOptions, ListImagesOptions, RemoveContainerOptions, RemoveImageOptions,
    RenameContainerOptions, RestartContainerOptions, StartContainerOptions, StopContainerOptions,
};
use bytes::Bytes;
use futures::StreamExt;
use http_body_util::{Either, Full};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// Build log lines kept for a failed build.
const BUILD_LOG_TAIL: usize = 50;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

/// Status code and message of an engine-reported failure.
fn server_error(e: &BollardError) -> Option<(u16, &str)> {
    match e {
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } => Some((*status_code, message.as_str())),
        _ => None,
    }
}

/// Whether the engine socket itself failed rather than the engine refusing.
fn is_unreachable(e: &BollardError) -> bool {
    matches!(
        e,
        BollardError::IOError { .. }
            | BollardError::RequestTimeoutError
            | BollardError::HyperResponseError { .. }
    )
}

fn looks_like_auth_failure(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("unauthorized")
        || lower.contains("authentication required")
        || lower.contains("denied")
}

fn looks_like_missing_image(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("not found") || lower.contains("manifest unknown") || lower.contains("no such")
}

fn looks_like_port_conflict(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("port is already allocated") || lower.contains("address already in use")
}

fn map_image_pull_error(e: BollardError, image_name: &str) -> ImageError {
    if is_unreachable(&e) {
        return ImageError::Unreachable(e.to_string());
    }
    let message = match (&e, server_error(&e)) {
        (_, Some((401 | 403, message))) => {
            return ImageError::AuthenticationFailed(format!("{}: {}", image_name, message));
        }
        (_, Some((status, message))) => {
            if status == 404 && !looks_like_auth_failure(message) {
                return ImageError::NotFound(image_name.to_string());
            }
            message.to_string()
        }
        (BollardError::DockerStreamError { error }, None) => error.clone(),
        _ => e.to_string(),
    };

    // Registries answer a missing repository and missing credentials alike
    // with "pull access denied ... may require login", on 404 as well as 500.
    // Credentials win.
    if looks_like_auth_failure(&message) {
        ImageError::AuthenticationFailed(format!("{}: {}", image_name, message))
    } else if looks_like_missing_image(&message) {
        ImageError::NotFound(format!("{}: {}", image_name, message))
    } else {
        ImageError::Runtime(format!("failed to pull {}: {}", image_name, message))
    }
}

fn map_probe_error(e: BollardError) -> ProbeError {
    match server_error(&e) {
        Some((_, message)) => ProbeError::Runtime(message.to_string()),
        None => ProbeError::ConnectionFailed(e.to_string()),
    }
}

fn map_image_remove_error(e: BollardError, image: &str) -> ImageError {
    match server_error(&e) {
        Some((404, _)) => ImageError::NotFound(image.to_string()),
        Some((409, message)) => ImageError::InUse(message.to_string()),
        _ if is_unreachable(&e) => ImageError::Unreachable(e.to_string()),
        _ => ImageError::Runtime(format!("failed to remove {}: {}", image, e)),
    }
}

fn map_image_list_error(e: BollardError) -> ImageError {
    if is_unreachable(&e) {
        ImageError::Unreachable(e.to_string())
    } else {
        ImageError::Runtime(e.to_string())
    }
}

fn map_container_create_error(e: BollardError) -> ContainerError {
    match server_error(&e) {
        Some((404, message)) => ContainerError::ImageNotFound(message.to_string()),
        Some((409, message)) => ContainerError::AlreadyExists(message.to_string()),
        Some((400, message)) => ContainerError::InvalidConfig(message.to_string()),
        _ => map_container_error(e),
    }
}

fn map_container_start_error(e: BollardError) -> ContainerError {
    match server_error(&e) {
        Some((404, message)) => ContainerError::NotFound(message.to_string()),
        Some((304, message)) => ContainerError::AlreadyRunning(message.to_string()),
        Some((_, message)) if looks_like_port_conflict(message) => {
            ContainerError::PortConflict(message.to_string())
        }
        _ => map_container_error(e),
    }
}

fn map_container_remove_error(e: BollardError) -> ContainerError {
    match server_error(&e) {
        Some((404, message)) => ContainerError::NotFound(message.to_string()),
        Some((409, message)) => ContainerError::InUse(message.to_string()),
        _ => map_container_error(e),
    }
}

fn map_container_rename_error(e: BollardError) -> ContainerError {
    match server_error(&e) {
        Some((404, message)) => ContainerError::NotFound(message.to_string()),
        Some((409, message)) => ContainerError::AlreadyExists(message.to_string()),
        _ => map_container_error(e),
    }
}

fn map_container_error(e: BollardError) -> ContainerError {
    match server_error(&e) {
        Some((404, message)) => ContainerError::NotFound(message.to_string()),
        _ if is_unreachable(&e) => ContainerError::Unreachable(e.to_string()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

// =============================================================================
// Container Creation
// =============================================================================

/// Translate a run request into the engine's create body. Each port pair is
/// exposed and bound to exactly one host port.
fn create_body(config: &RunConfig) -> ContainerCreateBody {
    let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
    let mut exposed_ports: Vec<String> = Vec::new();
    for pair in &config.ports {
        let key = pair.port_key();
        exposed_ports.push(key.clone());
        port_bindings.insert(
            key,
            Some(vec![PortBinding {
                host_ip: None,
                host_port: Some(pair.host_port.to_string()),
            }]),
        );
    }

    let host_config = HostConfig {
        port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
        binds: (!config.volumes.is_empty()).then(|| config.volumes.clone()),
        ..Default::default()
    };

    ContainerCreateBody {
        image: Some(config.image.clone()),
        cmd: (!config.command.is_empty()).then(|| config.command.clone()),
        env: (!config.environment.is_empty()).then(|| config.environment.clone()),
        exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
        host_config: Some(host_config),
        ..Default::default()
    }
}

// =============================================================================
// Build Context
// =============================================================================

/// Pack a lone Dockerfile into the tar archive the build endpoint expects.
pub fn dockerfile_archive(dockerfile: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut ar = tar::Builder::new(Vec::new());

    let mut header = tar::Header::new_gnu();
    header.set_path("Dockerfile")?;
    header.set_size(dockerfile.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    ar.append(&header, dockerfile)?;

    ar.into_inner()
}

fn context_bytes(context: BuildContext) -> Result<Bytes, ImageError> {
    match context {
        BuildContext::Dockerfile(content) if content.is_empty() => {
            Err(ImageError::InvalidContext("Dockerfile is empty".to_string()))
        }
        BuildContext::Dockerfile(content) => dockerfile_archive(&content)
            .map(Bytes::from)
            .map_err(|e| ImageError::InvalidContext(e.to_string())),
        BuildContext::Archive(archive) if archive.is_empty() => {
            Err(ImageError::InvalidContext("build archive is empty".to_string()))
        }
        BuildContext::Archive(archive) => Ok(archive),
    }
}

/// Keeps the tail of a build's output.
#[derive(Default)]
struct BuildLog {
    lines: VecDeque<String>,
}

impl BuildLog {
    fn push(&mut self, chunk: &str) {
        for line in chunk.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
            if self.lines.len() == BUILD_LOG_TAIL {
                self.lines.pop_front();
            }
            self.lines.push_back(line.to_string());
        }
    }

    fn into_failure(self, reason: String) -> ImageError {
        ImageError::BuildFailed {
            reason,
            log: self.lines.into(),
        }
    }
}

// =============================================================================
// BollardEngine
// =============================================================================

/// Container engine adapter using bollard.
///
/// Holds one client for the life of the process; the client is cheap to
/// clone and safe to share across concurrent requests.
#[derive(Clone)]
pub struct BollardEngine {
    client: Docker,
    runtime_type: RuntimeType,
}

impl BollardEngine {
    /// Wrap an existing bollard client.
    pub fn new(client: Docker, runtime_type: RuntimeType) -> Self {
        Self {
            client,
            runtime_type,
        }
    }

    /// Connect to the engine socket found by detection or configuration.
    pub fn connect(info: &RuntimeInfo, timeout: Duration) -> Result<Self, ProbeError> {
        let client = Docker::connect_with_unix(
            &info.socket_path,
            timeout.as_secs(),
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| ProbeError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new(client, info.runtime_type))
    }

    async fn list_image_views(&self) -> Result<Vec<Image>, ImageError> {
        let opts = ListImagesOptions {
            all: false,
            ..Default::default()
        };

        let summaries = self
            .client
            .list_images(Some(opts))
            .await
            .map_err(map_image_list_error)?;

        Ok(summaries.into_iter().map(image_view).collect())
    }

    async fn create_container(&self, config: &RunConfig) -> Result<ContainerId, ContainerError> {
        let body = create_body(config);
        let opts = config.name.as_ref().map(|name| CreateContainerOptions {
            name: Some(name.clone()),
            ..Default::default()
        });

        let response = self
            .client
            .create_container(opts, body)
            .await
            .map_err(map_container_create_error)?;

        for warning in &response.warnings {
            tracing::warn!(container = %response.id, "engine warning: {}", warning);
        }

        Ok(ContainerId::new(response.id))
    }
}

impl Sealed for BollardEngine {}

#[async_trait]
impl EngineProbe for BollardEngine {
    async fn info(&self) -> Result<EngineInfo, ProbeError> {
        let info = self.client.info().await.map_err(map_probe_error)?;

        Ok(EngineInfo {
            name: self.runtime_type.to_string(),
            version: info.server_version.unwrap_or_default(),
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
            os: info.operating_system.unwrap_or_default(),
            arch: info.architecture.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), ProbeError> {
        self.client.ping().await.map_err(map_probe_error)?;
        Ok(())
    }
}

#[async_trait]
impl ImageOps for BollardEngine {
    async fn list_images(&self) -> Result<Vec<Image>, ImageError> {
        self.list_image_views().await
    }

    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        let image_name = reference.to_string();

        let opts = CreateImageOptions {
            from_image: Some(image_name.clone()),
            ..Default::default()
        };

        // Pull returns a stream of progress updates; only the outcome matters.
        let mut stream = self.client.create_image(Some(opts), None, None);
        while let Some(result) = stream.next().await {
            let info = result.map_err(|e| map_image_pull_error(e, &image_name))?;
            if let Some(status) = info.status {
                tracing::trace!(image = %image_name, "{}", status);
            }
        }

        Ok(())
    }

    async fn remove_image(&self, image: &str) -> Result<(), ImageError> {
        let opts = RemoveImageOptions {
            force: false,
            ..Default::default()
        };

        self.client
            .remove_image(image, Some(opts), None)
            .await
            .map_err(|e| map_image_remove_error(e, image))?;

        Ok(())
    }

    async fn build_image(
        &self,
        context: BuildContext,
        tag: &ImageRef,
    ) -> Result<ImageId, ImageError> {
        let tag_name = tag.to_string();
        let body = Either::Left(Full::new(context_bytes(context)?));

        let options = BuildImageOptions {
            dockerfile: "Dockerfile".to_string(),
            t: Some(tag_name.clone()),
            rm: true,
            ..Default::default()
        };

        let mut log = BuildLog::default();
        let mut stream = self.client.build_image(options, None, Some(body));

        while let Some(result) = stream.next().await {
            match result {
                Ok(output) => {
                    if let Some(chunk) = output.stream.as_deref() {
                        log.push(chunk);
                    }
                    if let Some(detail) = output.error_detail {
                        let reason = detail
                            .message
                            .unwrap_or_else(|| "build reported an error".to_string());
                        return Err(log.into_failure(reason));
                    }
                }
                Err(e) if is_unreachable(&e) => return Err(ImageError::Unreachable(e.to_string())),
                Err(BollardError::DockerStreamError { error }) => {
                    return Err(log.into_failure(error));
                }
                Err(e) => {
                    let reason = server_error(&e)
                        .map(|(_, message)| message.to_string())
                        .unwrap_or_else(|| e.to_string());
                    return Err(log.into_failure(reason));
                }
            }
        }

        let inspect = self
            .client
            .inspect_image(&tag_name)
            .await
            .map_err(|e| {
                ImageError::Runtime(format!("built {} but inspect failed: {}", tag_name, e))
            })?;

        Ok(ImageId::new(inspect.id.unwrap_or_default()))
    }
}

#[async_trait]
impl ContainerOps for BollardEngine {
    async fn list_containers(&self) -> Result<Vec<Container>, ContainerError> {
        let images = self.list_image_views().await.map_err(|e| match e {
            ImageError::Unreachable(msg) => ContainerError::Unreachable(msg),
            other => ContainerError::Runtime(other.to_string()),
        })?;
        let tags = tag_index(&images);

        let opts = ListContainersOptions {
            all: true,
            ..Default::default()
        };

        let summaries = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(map_container_error)?;

        Ok(summaries
            .into_iter()
            .map(|summary| container_view(summary, &tags))
            .collect())
    }

    async fn run_container(&self, config: &RunConfig) -> Result<ContainerId, ContainerError> {
        let id = self.create_container(config).await?;

        if let Err(start_err) = self.start_container(&id).await {
            // Do not leave a created-but-never-started container behind.
            let opts = RemoveContainerOptions {
                force: true,
                ..Default::default()
            };
            if let Err(e) = self.client.remove_container(id.as_str(), Some(opts)).await {
                tracing::warn!(
                    container = %id,
                    "failed to remove container after failed start: {}",
                    e
                );
            }
            return Err(start_err);
        }

        Ok(id)
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
            .map_err(map_container_start_error)
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ContainerError> {
        let opts = StopContainerOptions {
            t: Some(timeout.as_secs() as i32),
            signal: None,
        };

        match self.client.stop_container(id.as_str(), Some(opts)).await {
            Ok(()) => Ok(()),
            // 304: already stopped.
            Err(e) if matches!(server_error(&e), Some((304, _))) => {
                tracing::debug!(container = %id, "container already stopped");
                Ok(())
            }
            Err(e) => Err(map_container_error(e)),
        }
    }

    async fn restart_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .restart_container(id.as_str(), None::<RestartContainerOptions>)
            .await
            .map_err(map_container_error)
    }

    async fn rename_container(
        &self,
        id: &ContainerId,
        new_name: &str,
    ) -> Result<(), ContainerError> {
        self.client
            .rename_container(
                id.as_str(),
                RenameContainerOptions {
                    name: new_name.to_string(),
                },
            )
            .await
            .map_err(map_container_rename_error)
    }

    async fn remove_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force: false,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_remove_error)
    }

    async fn commit_container(
        &self,
        id: &ContainerId,
        config: &CommitConfig,
    ) -> Result<ImageId, ContainerError> {
        let opts = CommitContainerOptions {
            container: Some(id.to_string()),
            repo: Some(config.repository.clone()),
            tag: config.tag.clone(),
            comment: config.message.clone(),
            author: config.author.clone(),
            changes: config.changes.clone(),
            ..Default::default()
        };

        let response = self
            .client
            .commit_container(opts, bollard::models::ContainerConfig::default())
            .await
            .map_err(map_container_error)?;

        Ok(ImageId::new(response.id))
    }
}
