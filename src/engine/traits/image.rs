// ABOUTME: Image operations trait for the container engine.
// ABOUTME: List, pull, remove and build images.

use super::shared_types::BuildContext;
use crate::model::Image;
use crate::sealed::Sealed;
use crate::types::{ImageId, ImageRef};
use async_trait::async_trait;

/// Image operations.
#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// List all local images.
    async fn list_images(&self) -> Result<Vec<Image>, ImageError>;

    /// Pull an image, waiting for the whole transfer to finish.
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError>;

    /// Remove an image by ID or reference. Never forced.
    async fn remove_image(&self, image: &str) -> Result<(), ImageError>;

    /// Build an image from the given context and tag it.
    async fn build_image(
        &self,
        context: BuildContext,
        tag: &ImageRef,
    ) -> Result<ImageId, ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("authentication required: {0}")]
    AuthenticationFailed(String),

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("invalid build context: {0}")]
    InvalidContext(String),

    #[error("build failed: {reason}")]
    BuildFailed { reason: String, log: Vec<String> },

    #[error("engine unreachable: {0}")]
    Unreachable(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
