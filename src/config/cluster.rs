// ABOUTME: Cluster API server connection settings.
// ABOUTME: Optional kubeconfig path and context, plus the request timeout.

use super::deserialize::deserialize_expanded_path;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Kubeconfig file; standard inference is used when absent.
    #[serde(default, deserialize_with = "deserialize_expanded_path")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one.
    #[serde(default)]
    pub context: Option<String>,

    /// Connect and read timeout for API server requests.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            kubeconfig: None,
            context: None,
            timeout: default_timeout(),
        }
    }
}
