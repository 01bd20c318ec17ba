//! `cost` command group: Cost Explorer queries and cost categories per OU

pub mod create;
pub mod get;
pub mod list;
pub mod reconcile;
pub mod time;

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::debug;

use super::{command_path, print_help, AwsOptions, Context};
use crate::aws::cost_explorer::{GetCostAndUsageRequest, COST_METRIC};
use crate::aws::{self, collect_pages, Client, Cost, OrganizationalUnit, TimePeriod};
use crate::error::Error;

#[derive(Args, Debug)]
pub struct CostCommand {
    #[command(flatten)]
    pub aws: AwsOptions,

    #[command(subcommand)]
    pub command: Option<CostSubcommand>,
}

#[derive(Subcommand, Debug)]
pub enum CostSubcommand {
    /// Get total cost of a given OU
    Get(get::GetOptions),

    /// Checks if there's a cost category for every OU. If an OU is missing a cost category, creates the cost category
    Reconcile(reconcile::ReconcileOptions),

    /// Create a cost category for the given OU
    Create(create::CreateOptions),

    /// List the cost of each OU under the given OU
    List(list::ListOptions),
}

impl CostSubcommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Get(_) => "get",
            Self::Reconcile(_) => "reconcile",
            Self::Create(_) => "create",
            Self::List(_) => "list",
        }
    }
}

pub fn run(cmd: &CostCommand, ctx: &mut Context) -> Result<()> {
    let Some(subcommand) = &cmd.command else {
        return print_help(&["cost"], &mut ctx.streams);
    };

    let path = command_path(&["cost", subcommand.name()]);
    cmd.aws.complete(&path, &mut ctx.streams.out)?;

    match subcommand {
        CostSubcommand::Get(ops) => get::run(ops, &cmd.aws, &path, ctx),
        CostSubcommand::Reconcile(ops) => reconcile::run(ops, &cmd.aws, ctx),
        CostSubcommand::Create(ops) => create::run(ops, &cmd.aws, ctx),
        CostSubcommand::List(ops) => list::run(ops, &cmd.aws, &path, ctx),
    }
}

/// Gets information regarding an Organizational Unit
pub fn get_ou(client: &dyn Client, ou_id: &str) -> Result<OrganizationalUnit, Error> {
    client
        .describe_organizational_unit(ou_id)
        .map_err(|source| Error::OrganizationalUnitLookup {
            id: ou_id.to_string(),
            source,
        })
}

/// Direct child OUs of `parent_id`.
pub fn child_ous(client: &dyn Client, parent_id: &str) -> aws::error::Result<Vec<OrganizationalUnit>> {
    collect_pages(|token| client.list_organizational_units_for_parent(parent_id, token))
}

/// Ids of the accounts directly under `parent_id`.
pub fn account_ids(client: &dyn Client, parent_id: &str) -> aws::error::Result<Vec<String>> {
    let accounts = collect_pages(|token| client.list_accounts_for_parent(parent_id, token))?;
    Ok(accounts.into_iter().map(|a| a.id).collect())
}

/// Ids of every account under `ou_id`, including all descendant OUs.
pub fn account_ids_recursive(client: &dyn Client, ou_id: &str) -> aws::error::Result<Vec<String>> {
    let mut ids = account_ids(client, ou_id)?;
    for child in child_ous(client, ou_id)? {
        ids.extend(account_ids_recursive(client, &child.id)?);
    }
    Ok(ids)
}

/// Net unblended cost of a set of accounts over `period`.
pub fn accounts_cost(
    client: &dyn Client,
    account_ids: Vec<String>,
    period: &TimePeriod,
) -> aws::error::Result<Cost> {
    if account_ids.is_empty() {
        return Ok(Cost::default());
    }

    let mut request = GetCostAndUsageRequest::for_accounts(period.clone(), account_ids);
    let mut cost = Cost::default();
    loop {
        let response = client.get_cost_and_usage(&request)?;
        cost += response.total(COST_METRIC);
        match response.next_page_token {
            Some(token) if !token.is_empty() => request.next_page_token = Some(token),
            _ => break,
        }
    }

    Ok(cost)
}

/// Cost of the accounts directly under `ou_id`, plus its descendants when `recursive`.
pub fn ou_cost(
    client: &dyn Client,
    ou_id: &str,
    period: &TimePeriod,
    recursive: bool,
) -> aws::error::Result<Cost> {
    let mut cost = accounts_cost(client, account_ids(client, ou_id)?, period)?;
    debug!(ou = ou_id, amount = cost.amount, "Direct cost of OU");

    if recursive {
        for child in child_ous(client, ou_id)? {
            cost += ou_cost(client, &child.id, period, true)?;
        }
    }

    Ok(cost)
}

/// Quote a CSV field when it contains a separator or a quote.
pub(crate) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
