//! `account reset`: return an Account CR to the unclaimed pool

use anyhow::Result;
use clap::Args;
use serde_json::json;
use std::io::Write;
use tracing::info;

use crate::cmd::Context;
use crate::k8s::ACCOUNT_NAMESPACE;

/// Secrets the operator creates per account, by suffix
const ACCOUNT_SECRET_SUFFIXES: [&str; 3] = ["secret", "sre-cli-credentials", "sre-console-url"];

#[derive(Args, Debug)]
pub struct ResetOptions {
    /// Account CR name
    pub account_name: String,

    /// Don't ask for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Also reset the legal entity and the reused flag
    #[arg(long = "reset-legalentity")]
    pub reset_legal_entity: bool,
}

pub fn run(ops: &ResetOptions, ctx: &mut Context) -> Result<()> {
    let name = &ops.account_name;
    // Fail on unknown accounts before asking anything.
    ctx.cluster.get_account(name)?;

    if !ops.yes {
        let question = format!("Reset Account CR {}?", name);
        if !ctx.streams.confirm(&question)? {
            writeln!(ctx.streams.out, "Aborted")?;
            return Ok(());
        }
    }

    for suffix in ACCOUNT_SECRET_SUFFIXES {
        let secret = format!("{}-{}", name, suffix);
        info!(secret = %secret, "Deleting secret");
        ctx.cluster.delete_secret(ACCOUNT_NAMESPACE, &secret)?;
    }

    let mut spec = json!({ "claimLink": "", "claimLinkNamespace": "" });
    let mut status = json!({ "claimed": false, "state": "" });
    if ops.reset_legal_entity {
        spec["legalEntity"] = json!({ "id": "", "name": "" });
        status["reused"] = json!(false);
    }

    ctx.cluster.patch_account(name, &json!({ "spec": spec }))?;
    ctx.cluster.patch_account_status(name, &json!({ "status": status }))?;

    writeln!(ctx.streams.out, "Reset Account CR {}", name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::aws::fake::RecordingBuilder;
    use crate::cmd::testing::run_args;
    use crate::k8s::fake::{account, FakeCluster, Patch};
    use crate::k8s::{Cluster, ACCOUNT_NAMESPACE};
    use serde_json::json;

    const NAME: &str = "osd-creds-mgmt-aaa";

    fn cluster() -> FakeCluster {
        FakeCluster {
            accounts: vec![account(NAME, "111", "Ready", true)],
            ..FakeCluster::default()
        }
        .with_secret(ACCOUNT_NAMESPACE, "osd-creds-mgmt-aaa-secret")
        .with_secret(ACCOUNT_NAMESPACE, "osd-creds-mgmt-aaa-sre-cli-credentials")
        .with_secret(ACCOUNT_NAMESPACE, "osd-creds-mgmt-aaa-sre-console-url")
        .with_secret(ACCOUNT_NAMESPACE, "unrelated")
    }

    #[test]
    fn test_reset_with_yes() {
        let cluster = cluster();
        let (result, out) = run_args(
            &["osd-utils-cli", "account", "reset", NAME, "-y"],
            &RecordingBuilder::empty(),
            &cluster,
            "",
        );
        result.unwrap();

        assert_eq!(out.contents(), format!("Reset Account CR {}\n", NAME));
        assert_eq!(
            cluster.list_secret_names(ACCOUNT_NAMESPACE).unwrap(),
            vec!["unrelated".to_string()]
        );
        assert_eq!(
            *cluster.patches.borrow(),
            vec![
                Patch::Object(
                    NAME.to_string(),
                    json!({"spec": {"claimLink": "", "claimLinkNamespace": ""}})
                ),
                Patch::Status(
                    NAME.to_string(),
                    json!({"status": {"claimed": false, "state": ""}})
                ),
            ]
        );
    }

    #[test]
    fn test_reset_legal_entity() {
        let cluster = cluster();
        let (result, _) = run_args(
            &["osd-utils-cli", "account", "reset", NAME, "--yes", "--reset-legalentity"],
            &RecordingBuilder::empty(),
            &cluster,
            "",
        );
        result.unwrap();

        let patches = cluster.patches.borrow();
        assert_eq!(
            patches[0],
            Patch::Object(
                NAME.to_string(),
                json!({"spec": {"claimLink": "", "claimLinkNamespace": "",
                                "legalEntity": {"id": "", "name": ""}}})
            )
        );
        assert_eq!(
            patches[1],
            Patch::Status(
                NAME.to_string(),
                json!({"status": {"claimed": false, "state": "", "reused": false}})
            )
        );
    }

    #[test]
    fn test_reset_declined() {
        let cluster = cluster();
        let (result, out) = run_args(
            &["osd-utils-cli", "account", "reset", NAME],
            &RecordingBuilder::empty(),
            &cluster,
            "n\n",
        );
        result.unwrap();

        assert!(out.contents().ends_with("Aborted\n"));
        assert!(cluster.patches.borrow().is_empty());
        assert!(cluster.has_secret(ACCOUNT_NAMESPACE, "osd-creds-mgmt-aaa-secret"));
    }

    #[test]
    fn test_reset_confirmed() {
        let cluster = cluster();
        let (result, out) = run_args(
            &["osd-utils-cli", "account", "reset", NAME],
            &RecordingBuilder::empty(),
            &cluster,
            "y\n",
        );
        result.unwrap();

        assert!(out.contents().contains("[y/N]"));
        assert_eq!(cluster.patches.borrow().len(), 2);
    }

    #[test]
    fn test_reset_unknown_account() {
        let cluster = cluster();
        let (result, _) = run_args(
            &["osd-utils-cli", "account", "reset", "missing", "-y"],
            &RecordingBuilder::empty(),
            &cluster,
            "",
        );
        assert!(result.is_err());
        assert!(cluster.patches.borrow().is_empty());
    }
}
