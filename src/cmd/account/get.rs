//! `account get`: look up operator resources by AWS account id

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde_json::json;
use std::io::Write;

use crate::cmd::{print_help, Context, OutputFormat};
use crate::k8s::{self, ACCOUNT_NAMESPACE};

#[derive(Args, Debug)]
pub struct GetCommand {
    #[command(subcommand)]
    pub resource: Option<GetResource>,
}

#[derive(Subcommand, Debug)]
pub enum GetResource {
    /// Get AWS Account CR
    Account(GetOptions),

    /// Get AWS Account Claim CR
    AccountClaim(GetOptions),

    /// Get AWS Account Legal Entity
    LegalEntity(GetOptions),

    /// Get AWS Account CR related secrets
    Secrets(GetOptions),
}

#[derive(Args, Debug)]
pub struct GetOptions {
    /// AWS account ID
    #[arg(short = 'i', long = "account-id")]
    pub account_id: String,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

pub fn run(cmd: &GetCommand, ctx: &mut Context) -> Result<()> {
    let Some(resource) = &cmd.resource else {
        return print_help(&["account", "get"], &mut ctx.streams);
    };

    match resource {
        GetResource::Account(ops) => get_account(ops, ctx),
        GetResource::AccountClaim(ops) => get_account_claim(ops, ctx),
        GetResource::LegalEntity(ops) => get_legal_entity(ops, ctx),
        GetResource::Secrets(ops) => get_secrets(ops, ctx),
    }
}

fn get_account(ops: &GetOptions, ctx: &mut Context) -> Result<()> {
    let account = k8s::find_account_by_aws_id(ctx.cluster, &ops.account_id)?;
    match ops.output {
        OutputFormat::Text => writeln!(ctx.streams.out, "{}", account.metadata.name)?,
        OutputFormat::Json => writeln!(ctx.streams.out, "{}", serde_json::to_string_pretty(&account)?)?,
    }
    Ok(())
}

fn get_account_claim(ops: &GetOptions, ctx: &mut Context) -> Result<()> {
    let account = k8s::find_account_by_aws_id(ctx.cluster, &ops.account_id)?;
    if account.spec.claim_link.is_empty() {
        bail!("Account {} is not claimed", account.metadata.name);
    }

    let claim = ctx
        .cluster
        .get_account_claim(&account.spec.claim_link_namespace, &account.spec.claim_link)?;
    match ops.output {
        OutputFormat::Text => writeln!(
            ctx.streams.out,
            "{}/{}",
            claim.metadata.namespace, claim.metadata.name
        )?,
        OutputFormat::Json => writeln!(ctx.streams.out, "{}", serde_json::to_string_pretty(&claim)?)?,
    }
    Ok(())
}

fn get_legal_entity(ops: &GetOptions, ctx: &mut Context) -> Result<()> {
    let account = k8s::find_account_by_aws_id(ctx.cluster, &ops.account_id)?;
    let entity = &account.spec.legal_entity;
    match ops.output {
        OutputFormat::Text => {
            writeln!(ctx.streams.out, "Legal Entity Name: {}", entity.name)?;
            writeln!(ctx.streams.out, "Legal Entity ID: {}", entity.id)?;
        }
        OutputFormat::Json => writeln!(
            ctx.streams.out,
            "{}",
            serde_json::to_string_pretty(&json!({ "name": entity.name, "id": entity.id }))?
        )?,
    }
    Ok(())
}

fn get_secrets(ops: &GetOptions, ctx: &mut Context) -> Result<()> {
    let account = k8s::find_account_by_aws_id(ctx.cluster, &ops.account_id)?;
    let prefix = format!("{}-", account.metadata.name);
    let secrets: Vec<String> = ctx
        .cluster
        .list_secret_names(ACCOUNT_NAMESPACE)?
        .into_iter()
        .filter(|name| name.starts_with(&prefix))
        .collect();

    match ops.output {
        OutputFormat::Text => {
            for name in &secrets {
                writeln!(ctx.streams.out, "{}", name)?;
            }
        }
        OutputFormat::Json => writeln!(ctx.streams.out, "{}", serde_json::to_string_pretty(&secrets)?)?,
    }
    Ok(())
}
