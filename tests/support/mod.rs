// ABOUTME: Test support utilities.
// ABOUTME: Tracing setup and backend availability checks for live tests.

use podgate::cluster::{ClusterOps, KubeCluster};
use podgate::config::{ClusterConfig, EngineConfig};
use podgate::engine::{self, BollardEngine};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("podgate=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Connect to the local engine, or `None` when there is none.
#[allow(dead_code)]
pub async fn local_engine() -> Option<BollardEngine> {
    engine::connect(&EngineConfig::default()).await.ok()
}

/// Connect to the cluster from the ambient kubeconfig, or `None` when it is
/// missing or the API server does not answer.
#[allow(dead_code)]
pub async fn live_cluster() -> Option<KubeCluster> {
    let cluster = KubeCluster::connect(&ClusterConfig::default()).await.ok()?;
    cluster.version().await.ok()?;
    Some(cluster)
}
