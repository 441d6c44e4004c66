// ABOUTME: Capability traits for the container engine adapter.
// ABOUTME: Defines ImageOps, ContainerOps and EngineProbe.

mod container;
mod image;
mod probe;
mod shared_types;

pub use container::{ContainerError, ContainerOps};
pub use image::{ImageError, ImageOps};
pub use probe::{EngineProbe, ProbeError};
pub use shared_types::*;

/// Everything the gateway needs from an engine.
pub trait Engine: ImageOps + ContainerOps + EngineProbe {}

impl<T: ImageOps + ContainerOps + EngineProbe> Engine for T {}
