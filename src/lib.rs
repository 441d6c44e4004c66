// ABOUTME: Library root for podgate - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod model;
pub(crate) mod sealed;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
