// ABOUTME: Operation error type with SNAFU pattern.
// ABOUTME: Wraps adapter errors and classifies each failure into one ErrorKind.

use serde::Serialize;
use snafu::Snafu;
use std::fmt;

use crate::cluster::ClusterError;
use crate::engine::{ContainerError, ImageError};

/// A failed gateway operation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum OperationError {
    #[snafu(display("{operation}: {source}"))]
    Image {
        operation: &'static str,
        source: ImageError,
    },

    #[snafu(display("{operation}: {source}"))]
    Container {
        operation: &'static str,
        source: ContainerError,
    },

    #[snafu(display("{operation}: {source}"))]
    Cluster {
        operation: &'static str,
        source: ClusterError,
    },

    #[snafu(display("{operation}: invalid request: {message}"))]
    InvalidRequest {
        operation: &'static str,
        message: String,
    },
}

/// The failure taxonomy every operation error falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The addressed resource does not exist.
    NotFound,
    /// A resource with that identity or name already exists.
    AlreadyExists,
    /// The resource is referenced by another and cannot be removed.
    InUse,
    /// The resource is in a state that forbids the operation.
    Conflict,
    /// The request or submitted document is malformed.
    InvalidSpec,
    /// Credentials were rejected or the action is not permitted.
    AuthRequired,
    /// The backend could not be reached.
    BackendUnreachable,
    /// An image build ran and failed.
    BuildFailed,
    /// Any other failure reported by the backend.
    Backend,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::InUse => "in_use",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidSpec => "invalid_spec",
            ErrorKind::AuthRequired => "auth_required",
            ErrorKind::BackendUnreachable => "backend_unreachable",
            ErrorKind::BuildFailed => "build_failed",
            ErrorKind::Backend => "backend",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn image_kind(e: &ImageError) -> ErrorKind {
    match e {
        ImageError::NotFound(_) => ErrorKind::NotFound,
        ImageError::AuthenticationFailed(_) => ErrorKind::AuthRequired,
        ImageError::InUse(_) => ErrorKind::InUse,
        ImageError::InvalidContext(_) => ErrorKind::InvalidSpec,
        ImageError::BuildFailed { .. } => ErrorKind::BuildFailed,
        ImageError::Unreachable(_) => ErrorKind::BackendUnreachable,
        ImageError::Runtime(_) => ErrorKind::Backend,
    }
}

fn container_kind(e: &ContainerError) -> ErrorKind {
    match e {
        ContainerError::NotFound(_) | ContainerError::ImageNotFound(_) => ErrorKind::NotFound,
        ContainerError::AlreadyExists(_) => ErrorKind::AlreadyExists,
        ContainerError::AlreadyRunning(_) | ContainerError::PortConflict(_) => ErrorKind::Conflict,
        ContainerError::InUse(_) => ErrorKind::InUse,
        ContainerError::InvalidConfig(_) => ErrorKind::InvalidSpec,
        ContainerError::Unreachable(_) => ErrorKind::BackendUnreachable,
        ContainerError::Runtime(_) => ErrorKind::Backend,
    }
}

fn cluster_kind(e: &ClusterError) -> ErrorKind {
    match e {
        ClusterError::NotFound(_) => ErrorKind::NotFound,
        ClusterError::AlreadyExists(_) => ErrorKind::AlreadyExists,
        ClusterError::InvalidSpec(_) => ErrorKind::InvalidSpec,
        ClusterError::Unauthorized(_) => ErrorKind::AuthRequired,
        ClusterError::Unreachable(_) => ErrorKind::BackendUnreachable,
        ClusterError::Api(_) => ErrorKind::Backend,
    }
}

impl OperationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OperationError::Image { source, .. } => image_kind(source),
            OperationError::Container { source, .. } => container_kind(source),
            OperationError::Cluster { source, .. } => cluster_kind(source),
            OperationError::InvalidRequest { .. } => ErrorKind::InvalidSpec,
        }
    }

    /// Name of the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            OperationError::Image { operation, .. }
            | OperationError::Container { operation, .. }
            | OperationError::Cluster { operation, .. }
            | OperationError::InvalidRequest { operation, .. } => *operation,
        }
    }

    /// Tail of the build output when an image build failed.
    pub fn build_log(&self) -> Option<&[String]> {
        match self {
            OperationError::Image {
                source: ImageError::BuildFailed { log, .. },
                ..
            } => Some(log),
            _ => None,
        }
    }
}
