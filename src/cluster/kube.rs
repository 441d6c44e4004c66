// ABOUTME: kube-rs based cluster adapter.
// ABOUTME: Builds one client at start-up and maps API server responses to views.

use super::projection::{deployment_view, node_view, object_ref, pod_view, service_view};
use super::traits::{ClusterError, ClusterOps, Document};
use crate::config::ClusterConfig;
use crate::model::{ClusterInfo, Deployment, Node, ObjectRef, Pod, Service};
use crate::sealed::Sealed;
use crate::types::{Namespace, ObjectName};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1 as apps;
use k8s_openapi::api::core::v1 as core;
use kube::api::{Api, ApiResource, DeleteParams, DynamicObject, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Failure to build the cluster client at start-up.
#[derive(Debug, thiserror::Error)]
pub enum ClusterConnectError {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(String),

    #[error("failed to build cluster client: {0}")]
    Client(String),
}

fn map_kube_error(e: kube::Error, what: &str) -> ClusterError {
    match e {
        kube::Error::Api(resp) => match resp.code {
            404 => ClusterError::NotFound(format!("{}: {}", what, resp.message)),
            409 => ClusterError::AlreadyExists(format!("{}: {}", what, resp.message)),
            400 | 422 => ClusterError::InvalidSpec(resp.message),
            401 | 403 => ClusterError::Unauthorized(resp.message),
            _ => ClusterError::Api(format!("{} ({}): {}", resp.reason, resp.code, resp.message)),
        },
        kube::Error::HyperError(e) => ClusterError::Unreachable(e.to_string()),
        kube::Error::Service(e) => ClusterError::Unreachable(e.to_string()),
        kube::Error::SerdeError(e) => ClusterError::Api(format!("unexpected response: {}", e)),
        other => ClusterError::Api(other.to_string()),
    }
}

/// Reject anything that is not a mapping before talking to the API server.
fn dynamic_object(spec: &Document) -> Result<DynamicObject, ClusterError> {
    if !spec.is_object() {
        return Err(ClusterError::InvalidSpec(
            "manifest must be a mapping".to_string(),
        ));
    }
    serde_json::from_value(spec.clone()).map_err(|e| ClusterError::InvalidSpec(e.to_string()))
}

/// Cluster adapter over one shared kube client.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the client from configuration.
    ///
    /// An explicit kubeconfig path or context wins; otherwise the usual
    /// inference applies (in-cluster service account, `KUBECONFIG`,
    /// `~/.kube/config`).
    pub async fn connect(config: &ClusterConfig) -> Result<Self, ClusterConnectError> {
        let options = KubeConfigOptions {
            context: config.context.clone(),
            ..Default::default()
        };

        let mut kube_config = match (&config.kubeconfig, &config.context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path)
                    .map_err(|e| ClusterConnectError::Kubeconfig(e.to_string()))?;
                kube::Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| ClusterConnectError::Kubeconfig(e.to_string()))?
            }
            (None, Some(_)) => kube::Config::from_kubeconfig(&options)
                .await
                .map_err(|e| ClusterConnectError::Kubeconfig(e.to_string()))?,
            (None, None) => kube::Config::infer()
                .await
                .map_err(|e| ClusterConnectError::Kubeconfig(e.to_string()))?,
        };

        kube_config.connect_timeout = Some(config.timeout);
        kube_config.read_timeout = Some(config.timeout);

        tracing::debug!(cluster_url = %kube_config.cluster_url, "connecting to API server");

        let client = Client::try_from(kube_config)
            .map_err(|e| ClusterConnectError::Client(e.to_string()))?;
        Ok(Self::new(client))
    }

    async fn list_all<K, V>(&self, project: fn(K) -> V) -> Result<Vec<V>, ClusterError>
    where
        K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
    {
        let api: Api<K> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| map_kube_error(e, &K::kind(&())))?;
        Ok(list.items.into_iter().map(project).collect())
    }

    async fn create_as<K>(
        &self,
        namespace: &Namespace,
        spec: &Document,
    ) -> Result<ObjectRef, ClusterError>
    where
        K: Resource<DynamicType = ()>,
    {
        let object = dynamic_object(spec)?;
        let resource = ApiResource::erase::<K>(&());
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace.as_str(), &resource);

        let created = api
            .create(&PostParams::default(), &object)
            .await
            .map_err(|e| map_kube_error(e, &K::kind(&())))?;

        Ok(object_ref(&created))
    }

    async fn delete_as<K>(
        &self,
        name: &ObjectName,
        namespace: &Namespace,
    ) -> Result<(), ClusterError>
    where
        K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope>,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace.as_str());
        api.delete(name.as_str(), &DeleteParams::default())
            .await
            .map_err(|e| map_kube_error(e, &format!("{} {}/{}", K::kind(&()), namespace, name)))?;
        Ok(())
    }
}

impl Sealed for KubeCluster {}

#[async_trait]
impl ClusterOps for KubeCluster {
    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        self.list_all::<core::Node, _>(node_view).await
    }

    async fn list_pods(&self) -> Result<Vec<Pod>, ClusterError> {
        self.list_all::<core::Pod, _>(pod_view).await
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>, ClusterError> {
        self.list_all::<apps::Deployment, _>(deployment_view).await
    }

    async fn create_deployment(
        &self,
        namespace: &Namespace,
        spec: &Document,
    ) -> Result<ObjectRef, ClusterError> {
        self.create_as::<apps::Deployment>(namespace, spec).await
    }

    async fn delete_deployment(
        &self,
        name: &ObjectName,
        namespace: &Namespace,
    ) -> Result<(), ClusterError> {
        self.delete_as::<apps::Deployment>(name, namespace).await
    }

    async fn list_services(&self) -> Result<Vec<Service>, ClusterError> {
        self.list_all::<core::Service, _>(service_view).await
    }

    async fn create_service(
        &self,
        namespace: &Namespace,
        spec: &Document,
    ) -> Result<ObjectRef, ClusterError> {
        self.create_as::<core::Service>(namespace, spec).await
    }

    async fn delete_service(
        &self,
        name: &ObjectName,
        namespace: &Namespace,
    ) -> Result<(), ClusterError> {
        self.delete_as::<core::Service>(name, namespace).await
    }

    async fn version(&self) -> Result<ClusterInfo, ClusterError> {
        let info = self
            .client
            .apiserver_version()
            .await
            .map_err(|e| map_kube_error(e, "version"))?;

        Ok(ClusterInfo {
            git_version: info.git_version,
            platform: info.platform,
        })
    }
}
