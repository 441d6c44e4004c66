// ABOUTME: Multipart decoding for uploads: build contexts and cluster manifests.
// ABOUTME: Turns form fields into typed gateway requests.

use super::error::ApiError;
use crate::cluster::Document;
use crate::engine::BuildContext;
use crate::gateway::{BuildImageRequest, CreateObjectRequest};
use axum::extract::Multipart;
use bytes::Bytes;

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    Ok(field.text().await?.trim().to_string())
}

/// Parse a YAML or JSON manifest into a structured document.
pub fn parse_manifest(bytes: &[u8]) -> Result<Document, ApiError> {
    serde_yaml::from_slice(bytes)
        .map_err(|e| ApiError::BadRequest(format!("manifest is not valid YAML or JSON: {}", e)))
}

/// Fields: `dockerfile` (a lone Dockerfile) or `context` (a tar archive), and `tag`.
pub async fn build_request(mut multipart: Multipart) -> Result<BuildImageRequest, ApiError> {
    let mut context = None;
    let mut tag = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "dockerfile" => context = Some(BuildContext::Dockerfile(field.bytes().await?)),
            "context" => context = Some(BuildContext::Archive(field.bytes().await?)),
            "tag" => tag = Some(text(field).await?),
            _ => {}
        }
    }

    Ok(BuildImageRequest {
        context: context.ok_or_else(|| {
            ApiError::BadRequest("missing field `dockerfile` or `context`".to_string())
        })?,
        tag: tag.ok_or_else(|| ApiError::BadRequest("missing field `tag`".to_string()))?,
    })
}

/// Fields: `namespace` and `file` (the manifest).
pub async fn create_request(mut multipart: Multipart) -> Result<CreateObjectRequest, ApiError> {
    let mut namespace = None;
    let mut manifest: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "namespace" => namespace = Some(text(field).await?),
            "file" => manifest = Some(field.bytes().await?),
            _ => {}
        }
    }

    let manifest =
        manifest.ok_or_else(|| ApiError::BadRequest("missing field `file`".to_string()))?;

    Ok(CreateObjectRequest {
        namespace: namespace
            .ok_or_else(|| ApiError::BadRequest("missing field `namespace`".to_string()))?,
        document: parse_manifest(&manifest)?,
    })
}
