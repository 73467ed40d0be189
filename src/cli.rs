use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::extension::ExtensionKind;

/// Top-level CLI entry point for the WordPress fleet provisioner.
#[derive(Parser, Debug)]
#[command(
    name = "wpfleet",
    about = "Declarative WordPress fleet provisioning over SSH",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Path to the fleet configuration document
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: PathBuf,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision every configured host (or a subset via --limit)
    Deploy(DeployOpts),
    /// Print the resolved connection descriptors without touching any host
    Targets,
    /// Print version information
    Version,
}

/// Options for the `deploy` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct DeployOpts {
    /// Only provision the named hosts (addresses from the Servers section)
    #[arg(long, value_delimiter = ',')]
    pub limit: Vec<String>,

    /// Reconcile only one extension kind (plugin or theme)
    #[arg(long, value_name = "KIND")]
    pub only: Option<ExtensionKind>,
}
