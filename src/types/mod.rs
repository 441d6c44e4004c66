// ABOUTME: Type-safe identifiers and validated request values.
// ABOUTME: Engine IDs, image references and cluster names.

mod id;
mod image_ref;
mod name;

pub use id::{ContainerId, Id, ImageId};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use name::{NameError, Namespace, ObjectName};
