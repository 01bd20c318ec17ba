//! `cost create`: cost category for an OU

use anyhow::{bail, Result};
use clap::Args;
use std::io::Write;
use tracing::info;

use super::{account_ids_recursive, get_ou};
use crate::aws::cost_explorer::CostCategoryDefinition;
use crate::aws::{Client, OrganizationalUnit};
use crate::cmd::{AwsOptions, Context};

#[derive(Args, Debug)]
pub struct CreateOptions {
    /// OU ID
    #[arg(long = "ou")]
    pub ou: String,
}

pub fn run(ops: &CreateOptions, aws: &AwsOptions, ctx: &mut Context) -> Result<()> {
    let client = aws.init_aws_clients(ctx.clients)?;

    let ou = get_ou(client.as_ref(), &ops.ou)?;
    let accounts = account_ids_recursive(client.as_ref(), &ou.id)?;
    let arn = create_cost_category(client.as_ref(), &ou, accounts)?;

    writeln!(
        ctx.streams.out,
        "Created cost category {} for OU {} ({})",
        arn, ou.name, ou.id
    )?;
    Ok(())
}

/// Create a cost category named after `ou` mapping `accounts`, every
/// account beneath it, to the OU name.
pub fn create_cost_category(
    client: &dyn Client,
    ou: &OrganizationalUnit,
    accounts: Vec<String>,
) -> Result<String> {
    if accounts.is_empty() {
        bail!(
            "OU {} ({}) has no accounts, a cost category needs at least one",
            ou.name,
            ou.id
        );
    }

    info!(ou = %ou.id, accounts = accounts.len(), "Creating cost category");
    let arn = client.create_cost_category_definition(&CostCategoryDefinition::for_accounts(
        &ou.name, accounts,
    ))?;
    Ok(arn)
}
