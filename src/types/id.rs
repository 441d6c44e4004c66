// ABOUTME: Phantom-typed identifiers assigned by the container engine.
// ABOUTME: Keeps container and image IDs apart at compile time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum ContainerMarker {}
pub enum ImageMarker {}

/// Length of the abbreviated form the engine shows for IDs.
const SHORT_LEN: usize = 12;

/// An engine-assigned identifier.
///
/// The value is always taken from a backend response; this crate never
/// generates one. Container and image IDs do not mix:
///
/// ```compile_fail
/// use podgate::types::{ContainerId, ImageId};
///
/// let image: ImageId = ImageId::new("sha256:abc");
/// let container: ContainerId = image;
/// ```
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

impl Id<ContainerMarker> {
    /// First 12 characters of the ID.
    pub fn short(&self) -> String {
        self.value.chars().take(SHORT_LEN).collect()
    }
}

impl Id<ImageMarker> {
    /// Abbreviated image ID. Digest-style IDs keep their `sha256:` prefix.
    pub fn short(&self) -> String {
        match self.value.strip_prefix("sha256:") {
            Some(hex) => format!("sha256:{}", hex.chars().take(SHORT_LEN).collect::<String>()),
            None => self.value.chars().take(SHORT_LEN).collect(),
        }
    }
}

// Manual trait implementations that don't require T to implement the trait.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

pub type ContainerId = Id<ContainerMarker>;
pub type ImageId = Id<ImageMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_short_id_takes_twelve_chars() {
        let id = ContainerId::new("4f66ad9a0b2e8c1d9e7f6a5b4c3d2e1f");
        assert_eq!(id.short(), "4f66ad9a0b2e");
    }

    #[test]
    fn image_short_id_keeps_digest_prefix() {
        let id =
            ImageId::new("sha256:7e01a0d0a1dcd9e539f8e9bbd80106d59efbdf97293b3d38f5d7a34501526cdb");
        assert_eq!(id.short(), "sha256:7e01a0d0a1dc");
    }

    #[test]
    fn short_id_of_short_value_is_unchanged() {
        assert_eq!(ContainerId::new("abc").short(), "abc");
        assert_eq!(ImageId::new("abc").short(), "abc");
    }
}
