//! `account check-secrets`: find Account CRs whose IAM user secret is missing

use anyhow::{bail, Result};
use clap::Args;
use std::collections::HashSet;
use std::io::Write;
use tracing::debug;

use crate::cmd::Context;
use crate::k8s::{Account, Cluster, ACCOUNT_NAMESPACE};

#[derive(Args, Debug)]
pub struct CheckSecretsOptions {
    /// Account CR name; every account when omitted
    pub account_name: Option<String>,
}

pub fn run(ops: &CheckSecretsOptions, ctx: &mut Context) -> Result<()> {
    let missing = missing_secrets(ctx.cluster, ops.account_name.as_deref())?;

    if missing.is_empty() {
        writeln!(ctx.streams.out, "All IAM user secrets are present")?;
        return Ok(());
    }

    for (account, secret) in &missing {
        writeln!(
            ctx.streams.out,
            "Account CR {} is missing secret {}",
            account, secret
        )?;
    }
    bail!("{} account(s) with missing IAM user secrets", missing.len());
}

/// `(account, secret)` pairs for every checked account whose secret is absent.
/// When checking all accounts, ones that don't name a secret are skipped.
pub fn missing_secrets(cluster: &dyn Cluster, account_name: Option<&str>) -> Result<Vec<(String, String)>> {
    let accounts: Vec<Account> = match account_name {
        Some(name) => vec![cluster.get_account(name)?],
        None => cluster
            .list_accounts()?
            .into_iter()
            .filter(|a| !a.spec.iam_user_secret.is_empty())
            .collect(),
    };

    let secrets: HashSet<String> = cluster.list_secret_names(ACCOUNT_NAMESPACE)?.into_iter().collect();
    debug!(accounts = accounts.len(), secrets = secrets.len(), "Checking IAM user secrets");

    Ok(accounts
        .iter()
        .map(|a| (a.metadata.name.clone(), a.iam_user_secret_name()))
        .filter(|(_, secret)| !secrets.contains(secret))
        .collect())
}
