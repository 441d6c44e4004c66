// ABOUTME: Sealed trait pattern for backend adapter traits.
// ABOUTME: Only adapters defined in this crate may implement them.

/// Sealed trait to prevent external implementations.
///
/// New operations can be added to the adapter traits without breaking
/// downstream code, because nothing outside the crate implements them.
pub trait Sealed {}
