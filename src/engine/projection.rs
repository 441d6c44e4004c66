// ABOUTME: Projection of bollard API objects into the uniform engine views.
// ABOUTME: One mapping function per engine object; nothing else reads bollard models.

use crate::model::{Container, ContainerImage, ContainerStatus, Image};
use crate::types::{ContainerId, ImageId};
use bollard::models::{ContainerSummary, ContainerSummaryStateEnum, ImageSummary};
use std::collections::HashMap;

/// Tag the engine reports for untagged images.
const UNTAGGED: &str = "<none>:<none>";

/// Image ID → tags, used to resolve the image of each listed container.
pub type TagIndex = HashMap<String, Vec<String>>;

fn real_tags(tags: &[String]) -> Vec<String> {
    tags.iter().filter(|t| t.as_str() != UNTAGGED).cloned().collect()
}

pub fn image_view(summary: ImageSummary) -> Image {
    let attrs = serde_json::to_value(&summary).unwrap_or_default();
    let id = ImageId::new(summary.id);

    Image {
        short_id: id.short(),
        tags: real_tags(&summary.repo_tags),
        labels: summary.labels,
        attrs,
        id,
    }
}

pub fn tag_index(images: &[Image]) -> TagIndex {
    images
        .iter()
        .map(|image| (image.id.to_string(), image.tags.clone()))
        .collect()
}

pub fn container_status(state: Option<ContainerSummaryStateEnum>) -> ContainerStatus {
    match state {
        Some(ContainerSummaryStateEnum::CREATED) => ContainerStatus::Created,
        Some(ContainerSummaryStateEnum::RUNNING) => ContainerStatus::Running,
        Some(ContainerSummaryStateEnum::PAUSED) => ContainerStatus::Paused,
        Some(ContainerSummaryStateEnum::RESTARTING) => ContainerStatus::Restarting,
        Some(ContainerSummaryStateEnum::REMOVING) => ContainerStatus::Removing,
        Some(ContainerSummaryStateEnum::EXITED) => ContainerStatus::Exited,
        Some(ContainerSummaryStateEnum::DEAD) => ContainerStatus::Dead,
        _ => ContainerStatus::Unknown,
    }
}

pub fn container_view(summary: ContainerSummary, tags: &TagIndex) -> Container {
    let id = ContainerId::new(summary.id.unwrap_or_default());
    let name = summary
        .names
        .unwrap_or_default()
        .first()
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_default();
    let image_id = summary.image_id.unwrap_or_default();

    Container {
        short_id: id.short(),
        name,
        status: container_status(summary.state),
        image: ContainerImage {
            tags: tags.get(&image_id).cloned().unwrap_or_default(),
            id: ImageId::new(image_id),
        },
        labels: summary.labels.unwrap_or_default(),
        id,
    }
}
