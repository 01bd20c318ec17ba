//! `account` command group: Account CRs on the cluster and the AWS accounts behind them

pub mod check_secrets;
pub mod clean_velero_snapshots;
pub mod cli;
pub mod console;
pub mod get;
pub mod list;
pub mod reset;
pub mod rotate_secret;
pub mod set;

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{print_help, Context};

/// Role assumed in member accounts
pub const DEFAULT_ROLE: &str = "OrganizationAccountAccessRole";

/// Session name used for AssumeRole
pub const SESSION_NAME: &str = "osd-utils-cli";

#[derive(Args, Debug)]
pub struct AccountCommand {
    #[command(subcommand)]
    pub command: Option<AccountSubcommand>,
}

#[derive(Subcommand, Debug)]
pub enum AccountSubcommand {
    /// Get resources
    Get(get::GetCommand),

    /// List resources
    List(list::ListCommand),

    /// Reset AWS Account CR
    Reset(reset::ResetOptions),

    /// Set AWS Account CR status
    Set(set::SetOptions),

    /// Generate an AWS console URL on the fly
    Console(console::ConsoleOptions),

    /// Generate temporary AWS CLI credentials on the fly
    Cli(cli::CliOptions),

    /// Delete EBS snapshots created by Velero
    CleanVeleroSnapshots(clean_velero_snapshots::CleanVeleroSnapshotsOptions),

    /// Check AWS Account CR IAM User credentials
    CheckSecrets(check_secrets::CheckSecretsOptions),

    /// Rotate IAM credentials secret
    RotateSecret(rotate_secret::RotateSecretOptions),
}

pub fn run(cmd: &AccountCommand, ctx: &mut Context) -> Result<()> {
    match &cmd.command {
        None => print_help(&["account"], &mut ctx.streams),
        Some(AccountSubcommand::Get(c)) => get::run(c, ctx),
        Some(AccountSubcommand::List(c)) => list::run(c, ctx),
        Some(AccountSubcommand::Reset(ops)) => reset::run(ops, ctx),
        Some(AccountSubcommand::Set(ops)) => set::run(ops, ctx),
        Some(AccountSubcommand::Console(ops)) => console::run(ops, ctx),
        Some(AccountSubcommand::Cli(ops)) => cli::run(ops, ctx),
        Some(AccountSubcommand::CleanVeleroSnapshots(ops)) => clean_velero_snapshots::run(ops, ctx),
        Some(AccountSubcommand::CheckSecrets(ops)) => check_secrets::run(ops, ctx),
        Some(AccountSubcommand::RotateSecret(ops)) => rotate_secret::run(ops, ctx),
    }
}

/// ARN of `role` in `account_id`.
pub fn role_arn(account_id: &str, role: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, role)
}
