//! `cost list`: cost of every child OU of an OU

use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::io::Write;

use super::get::OuCost;
use super::time::TimeOptions;
use super::{child_ous, csv_field, get_ou, ou_cost};
use crate::aws::{Client, TimePeriod};
use crate::cmd::{AwsOptions, Context};

#[derive(Args, Debug)]
pub struct ListOptions {
    /// get OU ID
    #[arg(long = "ou")]
    pub ou: String,

    #[command(flatten)]
    pub time: TimeOptions,

    /// Output result as CSV
    #[arg(long)]
    pub csv: bool,
}

/// Per-child costs and the parent's total (own accounts plus all children)
#[derive(Debug)]
pub struct CostListing {
    pub children: Vec<OuCost>,
    pub total: OuCost,
}

pub fn run(ops: &ListOptions, aws: &AwsOptions, path: &str, ctx: &mut Context) -> Result<()> {
    let period = ops.time.resolve(path, Local::now().date_naive())?;
    let client = aws.init_aws_clients(ctx.clients)?;

    let listing = list_costs(client.as_ref(), &ops.ou, &period)?;
    if ops.csv {
        write_csv(&mut ctx.streams.out, &listing)?;
    } else {
        write_table(&mut ctx.streams.out, &listing)?;
    }
    Ok(())
}

pub fn list_costs(client: &dyn Client, ou_id: &str, period: &TimePeriod) -> Result<CostListing> {
    let parent = get_ou(client, ou_id)?;
    let mut total = ou_cost(client, &parent.id, period, false)?;

    let mut children = Vec::new();
    for ou in child_ous(client, &parent.id)? {
        let cost = ou_cost(client, &ou.id, period, true)?;
        total += cost.clone();
        children.push(OuCost { ou, cost });
    }
    children.sort_by(|a, b| {
        b.cost
            .amount
            .partial_cmp(&a.cost.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(CostListing {
        children,
        total: OuCost { ou: parent, cost: total },
    })
}

fn write_table(out: &mut dyn Write, listing: &CostListing) -> std::io::Result<()> {
    writeln!(out, "{:<24} {:<32} {:>14}", "OU ID", "OU Name", "Cost")?;
    writeln!(out, "{}", "─".repeat(72))?;
    for row in &listing.children {
        writeln!(out, "{:<24} {:<32} {:>14}", row.ou.id, row.ou.name, row.cost.to_string())?;
    }
    writeln!(out, "{}", "─".repeat(72))?;
    writeln!(
        out,
        "{:<24} {:<32} {:>14}",
        listing.total.ou.id,
        format!("{} (total)", listing.total.ou.name),
        listing.total.cost.to_string()
    )
}

fn write_csv(out: &mut dyn Write, listing: &CostListing) -> std::io::Result<()> {
    writeln!(out, "OU ID,OU Name,Cost,Unit")?;
    for row in listing.children.iter().chain(std::iter::once(&listing.total)) {
        writeln!(
            out,
            "{},{},{:.2},{}",
            csv_field(&row.ou.id),
            csv_field(&row.ou.name),
            row.cost.amount,
            row.cost.unit
        )?;
    }
    Ok(())
}
