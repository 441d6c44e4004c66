// ABOUTME: HTTP API over the gateway, one route per operation.
// ABOUTME: Decodes requests, calls the gateway and renders results or errors.

mod error;
mod payload;
mod upload;

pub use error::{ApiError, status_for};
pub use payload::Payload;
pub use upload::parse_manifest;

use crate::cluster::ClusterOps;
use crate::engine::Engine;
use crate::gateway::{
    CommitContainerRequest, ContainerRequest, DeleteObjectRequest, Gateway, HealthReport,
    PullImageRequest, RemoveImageRequest, RenameContainerRequest, RunContainerRequest,
};
use crate::model::{Container, Deployment, Image, Node, Pod, Service};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;

/// Largest accepted request body; build contexts can be sizeable.
const MAX_UPLOAD: usize = 512 * 1024 * 1024;

/// Acknowledgement returned by every mutating route.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Ack {
    fn new(message: &'static str) -> Self {
        Ack {
            message,
            id: None,
            name: None,
            namespace: None,
        }
    }

    fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

type Reply<T> = Result<Json<T>, ApiError>;

/// Build the route table around a gateway.
pub fn router<E, C>(gateway: Gateway<E, C>) -> Router
where
    E: Engine + 'static,
    C: ClusterOps + 'static,
{
    Router::new()
        .route("/list_images", get(list_images::<E, C>))
        .route("/pull_image", post(pull_image::<E, C>))
        .route("/remove_image", post(remove_image::<E, C>))
        .route("/build_image", post(build_image::<E, C>))
        .route("/list_containers", get(list_containers::<E, C>))
        .route("/run_container", post(run_container::<E, C>))
        .route("/rename_container", post(rename_container::<E, C>))
        .route("/restart_container", post(restart_container::<E, C>))
        .route("/start_container", post(start_container::<E, C>))
        .route("/stop_container", post(stop_container::<E, C>))
        .route("/remove_container", post(remove_container::<E, C>))
        .route("/commit_container", post(commit_container::<E, C>))
        .route("/list_nodes", get(list_nodes::<E, C>))
        .route("/list_pods", get(list_pods::<E, C>))
        .route("/list_deployments", get(list_deployments::<E, C>))
        .route("/create_deployment", post(create_deployment::<E, C>))
        .route("/delete_deployment", post(delete_deployment::<E, C>))
        .route("/list_services", get(list_services::<E, C>))
        .route("/create_service", post(create_service::<E, C>))
        .route("/delete_service", post(delete_service::<E, C>))
        .route("/health", get(health::<E, C>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD))
        .with_state(gateway)
}

/// Serve the API on `addr` until Ctrl-C.
pub async fn serve<E, C>(gateway: Gateway<E, C>, addr: SocketAddr) -> crate::error::Result<()>
where
    E: Engine + 'static,
    C: ClusterOps + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| crate::error::Error::Bind { addr, source })?;

    tracing::info!("podgate listening on {}", addr);

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("podgate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

// -- Images --

async fn list_images<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
) -> Reply<Vec<Image>> {
    Ok(Json(gw.list_images().await?))
}

async fn pull_image<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<PullImageRequest>,
) -> Reply<Ack> {
    gw.pull_image(request).await?;
    Ok(Json(Ack::new("pull success")))
}

async fn remove_image<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<RemoveImageRequest>,
) -> Reply<Ack> {
    gw.remove_image(request).await?;
    Ok(Json(Ack::new("delete success")))
}

async fn build_image<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    multipart: Multipart,
) -> Reply<Ack> {
    let request = upload::build_request(multipart).await?;
    let id = gw.build_image(request).await?;
    Ok(Json(Ack::new("build success").with_id(id)))
}

// -- Containers --

async fn list_containers<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
) -> Reply<Vec<Container>> {
    Ok(Json(gw.list_containers().await?))
}

async fn run_container<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<RunContainerRequest>,
) -> Reply<Ack> {
    let id = gw.run_container(request).await?;
    Ok(Json(Ack::new("run success").with_id(id)))
}

async fn rename_container<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<RenameContainerRequest>,
) -> Reply<Ack> {
    gw.rename_container(request).await?;
    Ok(Json(Ack::new("rename success")))
}

async fn restart_container<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<ContainerRequest>,
) -> Reply<Ack> {
    gw.restart_container(request).await?;
    Ok(Json(Ack::new("restart success")))
}

async fn start_container<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<ContainerRequest>,
) -> Reply<Ack> {
    gw.start_container(request).await?;
    Ok(Json(Ack::new("start success")))
}

async fn stop_container<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<ContainerRequest>,
) -> Reply<Ack> {
    gw.stop_container(request).await?;
    Ok(Json(Ack::new("stop success")))
}

async fn remove_container<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<ContainerRequest>,
) -> Reply<Ack> {
    gw.remove_container(request).await?;
    Ok(Json(Ack::new("delete success")))
}

async fn commit_container<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<CommitContainerRequest>,
) -> Reply<Ack> {
    let id = gw.commit_container(request).await?;
    Ok(Json(Ack::new("commit success").with_id(id)))
}

// -- Cluster --

async fn list_nodes<E: Engine, C: ClusterOps>(State(gw): State<Gateway<E, C>>) -> Reply<Vec<Node>> {
    Ok(Json(gw.list_nodes().await?))
}

async fn list_pods<E: Engine, C: ClusterOps>(State(gw): State<Gateway<E, C>>) -> Reply<Vec<Pod>> {
    Ok(Json(gw.list_pods().await?))
}

async fn list_deployments<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
) -> Reply<Vec<Deployment>> {
    Ok(Json(gw.list_deployments().await?))
}

async fn create_deployment<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    multipart: Multipart,
) -> Reply<Ack> {
    let request = upload::create_request(multipart).await?;
    let created = gw.create_deployment(request).await?;
    Ok(Json(Ack {
        name: Some(created.name),
        namespace: Some(created.namespace),
        ..Ack::new("create success")
    }))
}

async fn delete_deployment<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<DeleteObjectRequest>,
) -> Reply<Ack> {
    gw.delete_deployment(request).await?;
    Ok(Json(Ack::new("delete success")))
}

async fn list_services<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
) -> Reply<Vec<Service>> {
    Ok(Json(gw.list_services().await?))
}

async fn create_service<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    multipart: Multipart,
) -> Reply<Ack> {
    let request = upload::create_request(multipart).await?;
    let created = gw.create_service(request).await?;
    Ok(Json(Ack {
        name: Some(created.name),
        namespace: Some(created.namespace),
        ..Ack::new("create success")
    }))
}

async fn delete_service<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
    Payload(request): Payload<DeleteObjectRequest>,
) -> Reply<Ack> {
    gw.delete_service(request).await?;
    Ok(Json(Ack::new("delete success")))
}

// -- Health --

async fn health<E: Engine, C: ClusterOps>(
    State(gw): State<Gateway<E, C>>,
) -> (StatusCode, Json<HealthReport>) {
    let report = gw.health().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
