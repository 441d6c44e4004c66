// ABOUTME: Projection of k8s-openapi objects into the uniform cluster views.
// ABOUTME: One mapping function per object kind.

use crate::model::{Deployment, Node, ObjectRef, Pod, PodContainerStatus, Service, ServicePort};
use k8s_openapi::Resource;
use k8s_openapi::api::apps::v1 as apps;
use k8s_openapi::api::core::v1 as core;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::DynamicObject;

fn name_of(meta: &ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

fn namespace_of(meta: &ObjectMeta) -> String {
    meta.namespace.clone().unwrap_or_default()
}

pub fn node_view(node: core::Node) -> Node {
    let status = node.status.unwrap_or_default();

    Node {
        kind: core::Node::KIND.to_string(),
        name: name_of(&node.metadata),
        namespace: String::new(),
        creation_timestamp: node.metadata.creation_timestamp.map(|t| t.0),
        allocatable: status
            .allocatable
            .unwrap_or_default()
            .into_iter()
            .map(|(resource, quantity)| (resource, quantity.0))
            .collect(),
        phase: status.phase,
    }
}

fn container_status_view(status: core::ContainerStatus) -> PodContainerStatus {
    PodContainerStatus {
        name: status.name,
        container_id: status.container_id,
        image_id: status.image_id,
        image: status.image,
        ready: status.ready,
    }
}

pub fn pod_view(pod: core::Pod) -> Pod {
    let status = pod.status.unwrap_or_default();

    Pod {
        namespace: namespace_of(&pod.metadata),
        name: name_of(&pod.metadata),
        creation_timestamp: pod.metadata.creation_timestamp.map(|t| t.0),
        pod_ip: status.pod_ip,
        node_name: pod.spec.and_then(|spec| spec.node_name),
        container_statuses: status
            .container_statuses
            .unwrap_or_default()
            .into_iter()
            .map(container_status_view)
            .collect(),
    }
}

pub fn deployment_view(deployment: apps::Deployment) -> Deployment {
    let status = deployment.status.unwrap_or_default();

    Deployment {
        name: name_of(&deployment.metadata),
        namespace: namespace_of(&deployment.metadata),
        creation_timestamp: deployment.metadata.creation_timestamp.map(|t| t.0),
        available_replicas: status.available_replicas,
        replicas: status.replicas,
    }
}

pub fn service_view(service: core::Service) -> Service {
    let spec = service.spec.unwrap_or_default();

    Service {
        name: name_of(&service.metadata),
        namespace: namespace_of(&service.metadata),
        creation_timestamp: service.metadata.creation_timestamp.map(|t| t.0),
        cluster_ip: spec.cluster_ip,
        external_ips: spec.external_ips.unwrap_or_default(),
        type_: spec.type_,
        ports: spec
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|p| ServicePort {
                node_port: p.node_port,
                port: p.port,
                protocol: p.protocol,
            })
            .collect(),
    }
}

/// Identity of an object as the API server returned it.
pub fn object_ref(created: &DynamicObject) -> ObjectRef {
    ObjectRef {
        name: name_of(&created.metadata),
        namespace: namespace_of(&created.metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
    use std::collections::BTreeMap;

    fn meta(name: &str, namespace: Option<&str>) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            namespace: namespace.map(str::to_string),
            creation_timestamp: Some(Time(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())),
            ..Default::default()
        }
    }

    #[test]
    fn node_view_flattens_allocatable() {
        let node = core::Node {
            metadata: meta("worker-1", None),
            status: Some(core::NodeStatus {
                allocatable: Some(BTreeMap::from([
                    ("cpu".to_string(), Quantity("4".to_string())),
                    ("memory".to_string(), Quantity("16Gi".to_string())),
                ])),
                ..Default::default()
            }),
            ..Default::default()
        };

        let view = node_view(node);
        assert_eq!(view.kind, "Node");
        assert_eq!(view.name, "worker-1");
        assert_eq!(view.namespace, "");
        assert_eq!(view.allocatable.get("memory").map(String::as_str), Some("16Gi"));
        assert!(view.phase.is_none());
        assert!(view.creation_timestamp.is_some());
    }

    #[test]
    fn pod_without_statuses_has_empty_list() {
        let pod = core::Pod {
            metadata: meta("web-0", Some("default")),
            ..Default::default()
        };

        let view = pod_view(pod);
        assert_eq!(view.namespace, "default");
        assert!(view.container_statuses.is_empty());
        assert!(view.pod_ip.is_none());
        assert!(view.node_name.is_none());
    }

    #[test]
    fn pod_view_flattens_container_statuses() {
        let pod = core::Pod {
            metadata: meta("web-0", Some("shop")),
            spec: Some(core::PodSpec {
                node_name: Some("worker-2".to_string()),
                ..Default::default()
            }),
            status: Some(core::PodStatus {
                pod_ip: Some("10.1.0.7".to_string()),
                container_statuses: Some(vec![core::ContainerStatus {
                    name: "nginx".to_string(),
                    container_id: Some("containerd://abc".to_string()),
                    image: "nginx:1.25".to_string(),
                    image_id: "docker.io/library/nginx@sha256:def".to_string(),
                    ready: true,
                    ..Default::default()
                }]),
                ..Default::default()
            }),
        };

        let view = pod_view(pod);
        assert_eq!(view.node_name.as_deref(), Some("worker-2"));
        assert_eq!(view.pod_ip.as_deref(), Some("10.1.0.7"));
        assert_eq!(view.container_statuses.len(), 1);
        let status = &view.container_statuses[0];
        assert_eq!(status.name, "nginx");
        assert_eq!(status.container_id.as_deref(), Some("containerd://abc"));
        assert!(status.ready);
    }

    #[test]
    fn deployment_view_reads_live_replicas() {
        let deployment = apps::Deployment {
            metadata: meta("api", Some("shop")),
            status: Some(apps::DeploymentStatus {
                replicas: Some(3),
                available_replicas: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        };

        let view = deployment_view(deployment);
        assert_eq!(view.name, "api");
        assert_eq!(view.replicas, Some(3));
        assert_eq!(view.available_replicas, Some(2));
    }

    #[test]
    fn service_view_maps_ports() {
        let service = core::Service {
            metadata: meta("api", Some("shop")),
            spec: Some(core::ServiceSpec {
                cluster_ip: Some("10.96.0.12".to_string()),
                type_: Some("NodePort".to_string()),
                ports: Some(vec![core::ServicePort {
                    port: 80,
                    node_port: Some(30080),
                    protocol: Some("TCP".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let view = service_view(service);
        assert_eq!(view.type_.as_deref(), Some("NodePort"));
        assert!(view.external_ips.is_empty());
        assert_eq!(
            view.ports,
            vec![ServicePort {
                node_port: Some(30080),
                port: 80,
                protocol: Some("TCP".to_string()),
            }]
        );
    }
}
