//! osd-utils-cli - utilities for OpenShift Dedicated AWS accounts and costs
//!
//! Manages the AWS account operator's Account CRs on the management cluster
//! and reports or categorizes AWS costs per Organizational Unit.

mod aws;
mod cmd;
mod error;
mod k8s;

use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cmd::{Cli, Context, IoStreams};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    debug!(kubeconfig = ?cli.kubeconfig, context = ?cli.context, "Starting osd-utils-cli");

    let cluster = k8s::KubectlCluster::new(cli.kubeconfig.clone(), cli.context.clone());
    let mut ctx = Context {
        streams: IoStreams::stdio(),
        clients: &aws::DefaultClientBuilder,
        cluster: &cluster,
    };

    match cmd::run(&cli, &mut ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
