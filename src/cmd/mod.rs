//! Command tree: `account` and `cost` groups and their subcommands

pub mod account;
pub mod cost;
pub mod options;
pub mod streams;
pub mod validation;

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::io::Write;

use crate::aws::ClientBuilder;
use crate::k8s::Cluster;
pub use options::AwsOptions;
pub use streams::IoStreams;

pub const BINARY_NAME: &str = "osd-utils-cli";

/// OpenShift Dedicated utilities for AWS accounts and costs
#[derive(Parser, Debug)]
#[command(name = BINARY_NAME)]
#[command(version)]
#[command(about = "OSD utilities for managing AWS accounts and costs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the kubeconfig file to use for cluster requests
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kubeconfig: Option<String>,

    /// The name of the kubeconfig context to use
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Enable debug logging (logs to stderr)
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// AWS Account related utilities
    #[command(disable_help_subcommand = true)]
    Account(account::AccountCommand),

    /// Cost Management related utilities
    #[command(
        disable_help_subcommand = true,
        long_about = "The cost command allows for cost management on the AWS platform (other\nplatforms may be added in the future)"
    )]
    Cost(cost::CostCommand),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// What a command needs from the outside world.
pub struct Context<'a> {
    pub streams: IoStreams,
    pub clients: &'a dyn ClientBuilder,
    pub cluster: &'a dyn Cluster,
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli, ctx: &mut Context) -> Result<()> {
    match &cli.command {
        Some(Commands::Account(cmd)) => account::run(cmd, ctx),
        Some(Commands::Cost(cmd)) => cost::run(cmd, ctx),
        None => print_help(&[], &mut ctx.streams),
    }
}

/// Write the help text of the command at `path`, e.g. `["account"]`.
pub fn print_help(path: &[&str], streams: &mut IoStreams) -> Result<()> {
    let mut root = Cli::command();
    root.build();

    let mut target = &mut root;
    for name in path {
        target = target
            .find_subcommand_mut(name)
            .ok_or_else(|| anyhow!("unknown command: {}", name))?;
    }

    write!(streams.out, "{}", target.render_help())?;
    Ok(())
}

/// Full invocation path used in usage errors, e.g. `osd-utils-cli cost get`.
pub fn command_path(path: &[&str]) -> String {
    std::iter::once(BINARY_NAME)
        .chain(path.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
