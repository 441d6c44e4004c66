// ABOUTME: Request shapes shared by the engine traits.
// ABOUTME: RunConfig, PortPair, BuildContext and CommitConfig.

use bytes::Bytes;
use std::fmt;

/// Configuration for creating and starting a detached container.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Image reference or ID to run.
    pub image: String,
    /// Container name; the engine picks one when absent.
    pub name: Option<String>,
    /// Command override; empty keeps the image default.
    pub command: Vec<String>,
    /// `KEY=VALUE` entries.
    pub environment: Vec<String>,
    /// Published ports.
    pub ports: Vec<PortPair>,
    /// Bind specifications (`/host/path:/container/path[:ro]` or `volume:/path`).
    pub volumes: Vec<String>,
}

/// One container port published on one host port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortPair {
    pub container_port: u16,
    pub host_port: u16,
    pub protocol: Protocol,
}

impl PortPair {
    /// Key the engine uses for exposed ports and bindings, e.g. `80/tcp`.
    pub fn port_key(&self) -> String {
        format!("{}/{}", self.container_port, self.protocol)
    }
}

/// Network protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
    Sctp,
}

impl Protocol {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Some(Protocol::Tcp),
            "udp" => Some(Protocol::Udp),
            "sctp" => Some(Protocol::Sctp),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => f.write_str("tcp"),
            Protocol::Udp => f.write_str("udp"),
            Protocol::Sctp => f.write_str("sctp"),
        }
    }
}

/// What gets sent to the engine as the build context.
#[derive(Debug, Clone)]
pub enum BuildContext {
    /// A lone Dockerfile; it is packed into a single-entry archive.
    Dockerfile(Bytes),
    /// A complete tar archive with a `Dockerfile` at its root.
    Archive(Bytes),
}

/// Options for snapshotting a container into an image.
#[derive(Debug, Clone, Default)]
pub struct CommitConfig {
    pub repository: String,
    pub tag: Option<String>,
    pub message: Option<String>,
    pub author: Option<String>,
    /// Dockerfile instructions applied to the new image, newline separated.
    pub changes: Option<String>,
}
