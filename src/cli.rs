// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "podgate")]
#[command(about = "One HTTP API over a local container engine and a Kubernetes cluster")]
#[command(version)]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: podgate.yml in the working directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a template podgate.yml into the working directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Connect to both backends and serve the HTTP API
    Serve {
        /// Listen address, overriding the configuration
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },

    /// Connect to both backends, report their versions and exit
    Check,
}
