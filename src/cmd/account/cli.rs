//! `account cli`: temporary CLI credentials for a member account

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::io::Write;
use tracing::info;

use super::{role_arn, DEFAULT_ROLE, SESSION_NAME};
use crate::aws::sts::AssumedRole;
use crate::cmd::{command_path, AwsOptions, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum CredentialFormat {
    /// `export` lines for a shell.
    #[default]
    Env,
    /// JSON object.
    Json,
}

#[derive(Args, Debug)]
pub struct CliOptions {
    #[command(flatten)]
    pub aws: AwsOptions,

    /// AWS account ID
    #[arg(short = 'i', long = "account-id")]
    pub account_id: String,

    /// Role to assume in the account
    #[arg(long, default_value = DEFAULT_ROLE)]
    pub role: String,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = CredentialFormat::Env)]
    pub output: CredentialFormat,

    /// Lifetime of the credentials in seconds
    #[arg(
        short = 'd',
        long,
        default_value_t = 3600,
        value_parser = clap::value_parser!(u32).range(900..=43200)
    )]
    pub duration: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CredentialsOutput<'a> {
    access_key_id: &'a str,
    secret_access_key: &'a str,
    session_token: &'a str,
    region: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration: Option<&'a str>,
}

pub fn run(ops: &CliOptions, ctx: &mut Context) -> Result<()> {
    ops.aws
        .complete(&command_path(&["account", "cli"]), &mut ctx.streams.err)?;
    let client = ops.aws.init_aws_clients(ctx.clients)?;

    let arn = role_arn(&ops.account_id, &ops.role);
    info!(role = %arn, "Assuming role for CLI credentials");
    let assumed = client.assume_role(&arn, SESSION_NAME, ops.duration)?;

    write_credentials(&mut ctx.streams.out, &assumed, client.region(), ops.output)?;
    Ok(())
}

fn write_credentials(
    out: &mut dyn Write,
    assumed: &AssumedRole,
    region: &str,
    format: CredentialFormat,
) -> Result<()> {
    let creds = &assumed.credentials;
    let token = creds.session_token.as_deref().unwrap_or_default();

    match format {
        CredentialFormat::Env => {
            writeln!(out, "export AWS_ACCESS_KEY_ID={}", creds.access_key_id)?;
            writeln!(out, "export AWS_SECRET_ACCESS_KEY={}", creds.secret_access_key)?;
            writeln!(out, "export AWS_SESSION_TOKEN={}", token)?;
            writeln!(out, "export AWS_DEFAULT_REGION={}", region)?;
        }
        CredentialFormat::Json => {
            let output = CredentialsOutput {
                access_key_id: &creds.access_key_id,
                secret_access_key: &creds.secret_access_key,
                session_token: token,
                region,
                expiration: assumed.expiration.as_deref(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }
    Ok(())
}
