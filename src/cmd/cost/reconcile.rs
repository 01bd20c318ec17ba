//! `cost reconcile`: make sure every OU has a cost category

use anyhow::Result;
use clap::Args;
use std::collections::HashSet;
use std::io::Write;
use tracing::debug;

use super::create::create_cost_category;
use super::{account_ids_recursive, child_ous, get_ou};
use crate::aws::{collect_pages, Client, OrganizationalUnit};
use crate::cmd::{AwsOptions, Context};

#[derive(Args, Debug)]
pub struct ReconcileOptions {
    /// get OU ID
    #[arg(long = "ou")]
    pub ou: String,
}

/// What happened to one OU
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created { ou: OrganizationalUnit, arn: String },
    Exists { ou: OrganizationalUnit },
    /// No accounts beneath the OU, nothing to categorize.
    Skipped { ou: OrganizationalUnit },
}

pub fn run(ops: &ReconcileOptions, aws: &AwsOptions, ctx: &mut Context) -> Result<()> {
    let client = aws.init_aws_clients(ctx.clients)?;

    for outcome in reconcile(client.as_ref(), &ops.ou)? {
        match outcome {
            Outcome::Created { ou, arn } => {
                writeln!(ctx.streams.out, "Created cost category for {} ({}): {}", ou.name, ou.id, arn)?
            }
            Outcome::Exists { ou } => {
                writeln!(ctx.streams.out, "Cost category for {} ({}) already exists", ou.name, ou.id)?
            }
            Outcome::Skipped { ou } => {
                writeln!(ctx.streams.out, "Skipping {} ({}): no accounts", ou.name, ou.id)?
            }
        }
    }
    Ok(())
}

/// Walk `ou_id` and its descendants, creating the missing cost categories.
pub fn reconcile(client: &dyn Client, ou_id: &str) -> Result<Vec<Outcome>> {
    let existing: HashSet<String> =
        collect_pages(|token| client.list_cost_category_definitions(token))?
            .into_iter()
            .map(|c| c.name)
            .collect();
    debug!(count = existing.len(), "Existing cost categories");

    let mut outcomes = Vec::new();
    let mut pending = vec![get_ou(client, ou_id)?];
    while let Some(ou) = pending.pop() {
        let mut children = child_ous(client, &ou.id)?;
        children.reverse();
        pending.extend(children);

        let outcome = if existing.contains(&ou.name) {
            Outcome::Exists { ou }
        } else {
            let accounts = account_ids_recursive(client, &ou.id)?;
            if accounts.is_empty() {
                Outcome::Skipped { ou }
            } else {
                let arn = create_cost_category(client, &ou, accounts)?;
                Outcome::Created { ou, arn }
            }
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
