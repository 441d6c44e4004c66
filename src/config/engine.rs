// ABOUTME: Container engine connection and behaviour settings.
// ABOUTME: Runtime override, socket, timeouts and port pairing policy.

use crate::engine::RuntimeType;
use serde::Deserialize;
use std::time::Duration;

/// How container ports are matched with host ports when their counts differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortPairing {
    /// Mismatched lengths are rejected.
    #[default]
    Strict,
    /// Pairing stops at the shorter list.
    Truncate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Runtime override (docker or podman). Auto-detected when absent.
    #[serde(default)]
    pub runtime: Option<RuntimeType>,

    /// Socket path override.
    #[serde(default)]
    pub socket: Option<String>,

    /// Timeout for each engine API call.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Grace period given to a container before it is killed on stop.
    #[serde(default = "default_stop_timeout", with = "humantime_serde")]
    pub stop_timeout: Duration,

    #[serde(default)]
    pub port_pairing: PortPairing,
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_stop_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            runtime: None,
            socket: None,
            timeout: default_timeout(),
            stop_timeout: default_stop_timeout(),
            port_pairing: PortPairing::default(),
        }
    }
}
