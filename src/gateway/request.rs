// ABOUTME: Typed requests accepted by the gateway, one per operation.
// ABOUTME: Includes positional port pairing for container runs.

use crate::cluster::Document;
use crate::config::PortPairing;
use crate::engine::{BuildContext, PortPair, Protocol};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
pub struct PullImageRequest {
    pub repository: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoveImageRequest {
    pub image_id: String,
}

/// Build context plus the tag to apply. Assembled by the transport from an
/// upload, so it has no wire form of its own.
#[derive(Debug, Clone)]
pub struct BuildImageRequest {
    pub context: BuildContext,
    pub tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunContainerRequest {
    pub image: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub environment: Vec<String>,
    #[serde(default)]
    pub container_ports: Vec<PortEntry>,
    #[serde(default)]
    pub host_ports: Vec<PortEntry>,
    #[serde(default)]
    pub volumes: Vec<String>,
}

/// Addresses one container by ID or name.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerRequest {
    pub container_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenameContainerRequest {
    pub container_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitContainerRequest {
    pub container_id: String,
    pub repository: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub changes: Option<String>,
}

/// A manifest to submit into a namespace.
#[derive(Debug, Clone)]
pub struct CreateObjectRequest {
    pub namespace: String,
    pub document: Document,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteObjectRequest {
    pub name: String,
    pub namespace: String,
}

/// A port as callers write it: `80`, `"80"` or `"53/udp"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortEntry {
    Number(u32),
    Text(String),
}

impl fmt::Display for PortEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortEntry::Number(n) => write!(f, "{}", n),
            PortEntry::Text(s) => f.write_str(s),
        }
    }
}

impl PortEntry {
    /// Port number and the protocol, if one was written.
    pub fn parse(&self) -> Result<(u16, Option<Protocol>), String> {
        let (number, protocol) = match self {
            PortEntry::Number(n) => (n.to_string(), None),
            PortEntry::Text(s) => match s.trim().split_once('/') {
                Some((number, protocol)) => {
                    let protocol = Protocol::parse(protocol)
                        .ok_or_else(|| format!("unknown protocol in port '{}'", s))?;
                    (number.to_string(), Some(protocol))
                }
                None => (s.trim().to_string(), None),
            },
        };

        match number.parse::<u16>() {
            Ok(port) if port > 0 => Ok((port, protocol)),
            _ => Err(format!("invalid port '{}'", self)),
        }
    }
}

/// Pair container ports with host ports by position.
///
/// The protocol of each pair comes from the container-side entry.
pub fn pair_ports(
    container_ports: &[PortEntry],
    host_ports: &[PortEntry],
    policy: PortPairing,
) -> Result<Vec<PortPair>, String> {
    if policy == PortPairing::Strict && container_ports.len() != host_ports.len() {
        return Err(format!(
            "{} container port(s) but {} host port(s)",
            container_ports.len(),
            host_ports.len()
        ));
    }

    container_ports
        .iter()
        .zip(host_ports)
        .map(|(container, host)| {
            let (container_port, protocol) = container.parse()?;
            let (host_port, _) = host.parse()?;
            Ok(PortPair {
                container_port,
                host_port,
                protocol: protocol.unwrap_or_default(),
            })
        })
        .collect()
}
