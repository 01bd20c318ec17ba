//! `account console`: federated console sign-in URL for a member account

use anyhow::Result;
use clap::Args;
use std::io::Write;
use tracing::info;

use super::{role_arn, DEFAULT_ROLE, SESSION_NAME};
use crate::aws::sts;
use crate::cmd::{command_path, AwsOptions, Context, BINARY_NAME};

#[derive(Args, Debug)]
pub struct ConsoleOptions {
    #[command(flatten)]
    pub aws: AwsOptions,

    /// AWS account ID
    #[arg(short = 'i', long = "account-id")]
    pub account_id: String,

    /// The duration of the console session in seconds
    #[arg(
        short = 'd',
        long,
        default_value_t = 3600,
        value_parser = clap::value_parser!(u32).range(900..=43200)
    )]
    pub duration: u32,

    /// Role to assume in the account
    #[arg(long, default_value = DEFAULT_ROLE)]
    pub role: String,
}

pub fn run(ops: &ConsoleOptions, ctx: &mut Context) -> Result<()> {
    ops.aws
        .complete(&command_path(&["account", "console"]), &mut ctx.streams.err)?;
    let client = ops.aws.init_aws_clients(ctx.clients)?;

    let arn = role_arn(&ops.account_id, &ops.role);
    info!(role = %arn, duration = ops.duration, "Assuming role for console access");
    let assumed = client.assume_role(&arn, SESSION_NAME, ops.duration)?;
    let token = client.get_signin_token(&assumed.credentials, ops.duration)?;
    let url = sts::console_login_url(&token, BINARY_NAME)?;

    writeln!(ctx.streams.out, "The AWS Console URL is:\n{}", url)?;
    Ok(())
}
