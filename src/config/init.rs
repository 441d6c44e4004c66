// ABOUTME: Config scaffolding for new installations.
// ABOUTME: Writes a commented podgate.yml template.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"# Address the HTTP API listens on.
listen: 0.0.0.0:5000

engine:
  # Auto-detected when unset (rootless Podman, rootful Podman, then Docker).
  # runtime: docker
  # socket: /var/run/docker.sock
  timeout: 120s
  stop_timeout: 10s
  # strict rejects runs whose container and host port lists differ in length;
  # truncate pairs them up to the shorter list.
  port_pairing: strict

cluster:
  # Standard inference (in-cluster, KUBECONFIG, ~/.kube/config) when unset.
  # kubeconfig: ~/.kube/config
  # context: my-context
  timeout: 30s
"#;

/// Write a template config into `dir`, refusing to overwrite unless `force`.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;
    Ok(())
}
