//! `account clean-velero-snapshots`: remove Velero's EBS snapshots

use anyhow::{bail, Result};
use clap::Args;
use std::io::Write;
use tracing::{info, warn};

use crate::aws::{collect_pages, Client};
use crate::cmd::{command_path, AwsOptions, Context};

/// Tag Velero puts on every snapshot it takes
pub const VELERO_BACKUP_TAG: &str = "velero.io/backup";

#[derive(Args, Debug)]
pub struct CleanVeleroSnapshotsOptions {
    #[command(flatten)]
    pub aws: AwsOptions,

    /// Only print the snapshots that would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(ops: &CleanVeleroSnapshotsOptions, ctx: &mut Context) -> Result<()> {
    ops.aws.complete(
        &command_path(&["account", "clean-velero-snapshots"]),
        &mut ctx.streams.err,
    )?;
    let client = ops.aws.init_aws_clients(ctx.clients)?;

    clean_snapshots(client.as_ref(), ops.dry_run, &mut ctx.streams.out)
}

/// Delete every snapshot carrying the Velero tag. Keeps going past failed
/// deletes and reports them together at the end.
pub fn clean_snapshots(client: &dyn Client, dry_run: bool, out: &mut dyn Write) -> Result<()> {
    let snapshots = collect_pages(|token| client.describe_snapshots(VELERO_BACKUP_TAG, token))?;
    info!(count = snapshots.len(), region = client.region(), "Found Velero snapshots");

    if snapshots.is_empty() {
        writeln!(out, "No Velero snapshots found")?;
        return Ok(());
    }

    let mut failed = 0;
    for id in &snapshots {
        if dry_run {
            writeln!(out, "Would delete snapshot {}", id)?;
            continue;
        }
        match client.delete_snapshot(id) {
            Ok(()) => writeln!(out, "Deleted snapshot {}", id)?,
            Err(e) => {
                warn!(snapshot = %id, error = %e, "Failed to delete snapshot");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("failed to delete {} of {} snapshots", failed, snapshots.len());
    }
    Ok(())
}
