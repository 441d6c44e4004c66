// ABOUTME: Entry point for the podgate CLI application.
// ABOUTME: Parses arguments, connects the backends and dispatches commands.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use podgate::cluster::{ClusterOps, KubeCluster};
use podgate::config::{self, Config};
use podgate::engine::{self, EngineProbe};
use podgate::error::Result;
use podgate::gateway::{Gateway, Settings};
use podgate::server;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag
    let default = if cli.verbose {
        "podgate=debug,info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(hint) = e.hint() {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            println!("Wrote {}", cwd.join(config::CONFIG_FILENAME).display());
            Ok(())
        }
        Commands::Serve { listen } => {
            let config = Config::resolve(cli.config.as_deref(), &cwd)?;
            let addr = listen.unwrap_or(config.listen);
            serve(config, addr).await
        }
        Commands::Check => {
            let config = Config::resolve(cli.config.as_deref(), &cwd)?;
            check(config).await
        }
    }
}

/// Connect both backends once and serve until interrupted.
async fn serve(config: Config, addr: std::net::SocketAddr) -> Result<()> {
    let local = engine::connect(&config.engine).await?;
    let cluster = KubeCluster::connect(&config.cluster).await?;

    let gateway = Gateway::new(local, cluster, Settings::from(&config.engine));
    server::serve(gateway, addr).await
}

/// Probe both backends and print what answered.
async fn check(config: Config) -> Result<()> {
    let local = engine::connect(&config.engine).await?;
    let info = local.info().await.map_err(engine::EngineConnectError::from)?;
    println!(
        "Engine:  {} {} (API {}, {}/{})",
        info.name, info.version, info.api_version, info.os, info.arch
    );

    let cluster = KubeCluster::connect(&config.cluster).await?;
    let version = cluster.version().await?;
    println!("Cluster: {} ({})", version.git_version, version.platform);

    Ok(())
}
