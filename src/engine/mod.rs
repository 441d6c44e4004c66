// ABOUTME: Local container engine adapter for Docker and Podman.
// ABOUTME: Detects the engine socket and wraps it behind capability traits.

mod bollard;
mod detection;
mod error;
mod projection;
pub mod traits;
mod types;

pub use self::bollard::{BollardEngine, dockerfile_archive};
pub use detection::{DetectionError, detect_local, resolve};
pub use error::{EngineConnectError, EngineConnectErrorKind};
pub use traits::*;
pub use types::{RuntimeInfo, RuntimeType};

use crate::config::EngineConfig;

/// Resolve the configured engine and open one shared connection to it.
pub async fn connect(config: &EngineConfig) -> Result<BollardEngine, EngineConnectError> {
    let info = resolve(config)?;
    let engine = BollardEngine::connect(&info, config.timeout)?;
    engine.ping().await?;

    tracing::info!(
        runtime = %info.runtime_type,
        socket = %info.socket_path,
        "connected to container engine"
    );
    Ok(engine)
}
