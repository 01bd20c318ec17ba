//! `cost get`: total cost of an OU

use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::io::Write;
use tracing::info;

use super::time::TimeOptions;
use super::{csv_field, get_ou, ou_cost};
use crate::aws::{Client, Cost, OrganizationalUnit, TimePeriod};
use crate::cmd::{AwsOptions, Context};

#[derive(Args, Debug)]
pub struct GetOptions {
    /// Get OU ID
    #[arg(long = "ou")]
    pub ou: String,

    /// Recurse through OUs
    #[arg(short, long)]
    pub recursive: bool,

    #[command(flatten)]
    pub time: TimeOptions,

    /// Output result as CSV
    #[arg(long)]
    pub csv: bool,
}

/// Cost of one OU over a period
#[derive(Debug, Clone)]
pub struct OuCost {
    pub ou: OrganizationalUnit,
    pub cost: Cost,
}

pub fn run(ops: &GetOptions, aws: &AwsOptions, path: &str, ctx: &mut Context) -> Result<()> {
    let period = ops.time.resolve(path, Local::now().date_naive())?;
    let client = aws.init_aws_clients(ctx.clients)?;

    info!(ou = %ops.ou, start = %period.start, end = %period.end, "Getting OU cost");
    let result = get_cost(client.as_ref(), &ops.ou, &period, ops.recursive)?;

    write_cost(&mut ctx.streams.out, &result, ops.recursive, ops.csv)?;
    Ok(())
}

pub fn get_cost(client: &dyn Client, ou_id: &str, period: &TimePeriod, recursive: bool) -> Result<OuCost> {
    let ou = get_ou(client, ou_id)?;
    let cost = ou_cost(client, &ou.id, period, recursive)?;
    Ok(OuCost { ou, cost })
}

fn write_cost(out: &mut dyn Write, result: &OuCost, recursive: bool, csv: bool) -> std::io::Result<()> {
    if csv {
        writeln!(out, "OU ID,OU Name,Cost,Unit")?;
        return writeln!(
            out,
            "{},{},{:.2},{}",
            csv_field(&result.ou.id),
            csv_field(&result.ou.name),
            result.cost.amount,
            result.cost.unit
        );
    }

    let scope = if recursive { " and its child OUs" } else { "" };
    writeln!(
        out,
        "Cost of {} OU ({}){}: {}",
        result.ou.name, result.ou.id, scope, result.cost
    )
}
