//! `account list`: Account and AccountClaim CRs as tables

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

use crate::cmd::{print_help, Context, OutputFormat};
use crate::k8s::{Account, AccountClaim};

#[derive(Args, Debug)]
pub struct ListCommand {
    #[command(subcommand)]
    pub resource: Option<ListResource>,
}

#[derive(Subcommand, Debug)]
pub enum ListResource {
    /// List AWS Account CR
    Account(ListAccountOptions),

    /// List AWS Account Claim CR
    AccountClaim(ListAccountClaimOptions),
}

#[derive(Args, Debug, Default)]
pub struct ListAccountOptions {
    /// Account CR status state
    #[arg(long)]
    pub state: Option<String>,

    /// Only accounts with this claimed status
    #[arg(long)]
    pub claimed: Option<bool>,

    /// Only accounts with this reused status
    #[arg(long)]
    pub reused: Option<bool>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Args, Debug, Default)]
pub struct ListAccountClaimOptions {
    /// Account Claim CR status state
    #[arg(long)]
    pub state: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl ListAccountOptions {
    pub fn matches(&self, account: &Account) -> bool {
        self.state.as_ref().map_or(true, |s| *s == account.status.state)
            && self.claimed.map_or(true, |c| c == account.status.claimed)
            && self.reused.map_or(true, |r| r == account.status.reused)
    }
}

impl ListAccountClaimOptions {
    pub fn matches(&self, claim: &AccountClaim) -> bool {
        self.state.as_ref().map_or(true, |s| *s == claim.status.state)
    }
}

pub fn run(cmd: &ListCommand, ctx: &mut Context) -> Result<()> {
    match &cmd.resource {
        None => print_help(&["account", "list"], &mut ctx.streams),
        Some(ListResource::Account(ops)) => list_accounts(ops, ctx),
        Some(ListResource::AccountClaim(ops)) => list_account_claims(ops, ctx),
    }
}

fn list_accounts(ops: &ListAccountOptions, ctx: &mut Context) -> Result<()> {
    let accounts: Vec<Account> = ctx
        .cluster
        .list_accounts()?
        .into_iter()
        .filter(|a| ops.matches(a))
        .collect();

    if ops.output == OutputFormat::Json {
        writeln!(ctx.streams.out, "{}", serde_json::to_string_pretty(&accounts)?)?;
        return Ok(());
    }

    let out = &mut ctx.streams.out;
    writeln!(
        out,
        "{:<32} {:<16} {:<16} {:<8} {:<8} LEGAL ENTITY",
        "NAME", "STATE", "AWS ACCOUNT ID", "CLAIMED", "REUSED"
    )?;
    for a in &accounts {
        writeln!(
            out,
            "{:<32} {:<16} {:<16} {:<8} {:<8} {}",
            a.metadata.name,
            a.status.state,
            a.spec.aws_account_id,
            a.status.claimed,
            a.status.reused,
            a.spec.legal_entity.name
        )?;
    }
    Ok(())
}

fn list_account_claims(ops: &ListAccountClaimOptions, ctx: &mut Context) -> Result<()> {
    let claims: Vec<AccountClaim> = ctx
        .cluster
        .list_account_claims()?
        .into_iter()
        .filter(|c| ops.matches(c))
        .collect();

    if ops.output == OutputFormat::Json {
        writeln!(ctx.streams.out, "{}", serde_json::to_string_pretty(&claims)?)?;
        return Ok(());
    }

    let out = &mut ctx.streams.out;
    writeln!(out, "{:<24} {:<32} {:<12} ACCOUNT LINK", "NAMESPACE", "NAME", "STATE")?;
    for c in &claims {
        writeln!(
            out,
            "{:<24} {:<32} {:<12} {}",
            c.metadata.namespace, c.metadata.name, c.status.state, c.spec.account_link
        )?;
    }
    Ok(())
}
