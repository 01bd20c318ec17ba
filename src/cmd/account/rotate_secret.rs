//! `account rotate-secret`: new IAM access key for an account's admin user

use anyhow::{bail, Context as _, Result};
use clap::Args;
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, info};

use super::{role_arn, DEFAULT_ROLE, SESSION_NAME};
use crate::aws::iam::AccessKey;
use crate::aws::{collect_pages, AwsClientInput, Client};
use crate::cmd::{command_path, AwsOptions, Context};
use crate::k8s::{Account, Cluster, Secret, ACCOUNT_NAMESPACE};

/// IAM user the operator manages in every account
const ADMIN_USER_PREFIX: &str = "osdManagedAdmin";

/// IAM allows this many access keys per user
const MAX_ACCESS_KEYS: usize = 2;

#[derive(Args, Debug)]
pub struct RotateSecretOptions {
    #[command(flatten)]
    pub aws: AwsOptions,

    /// Account CR name
    pub account_name: String,

    /// Role to assume in the account
    #[arg(long, default_value = DEFAULT_ROLE)]
    pub role: String,
}

pub fn run(ops: &RotateSecretOptions, ctx: &mut Context) -> Result<()> {
    ops.aws
        .complete(&command_path(&["account", "rotate-secret"]), &mut ctx.streams.err)?;

    let account = ctx.cluster.get_account(&ops.account_name)?;
    if account.spec.aws_account_id.is_empty() {
        bail!("Account CR {} has no AWS account ID", account.metadata.name);
    }

    let client = ops.aws.init_aws_clients(ctx.clients)?;
    let arn = role_arn(&account.spec.aws_account_id, &ops.role);
    info!(role = %arn, "Assuming role to rotate credentials");
    let assumed = client.assume_role(&arn, SESSION_NAME, 900)?;
    let member = ctx
        .clients
        .new_aws_client_with_input(&AwsClientInput::from(&assumed.credentials))?;

    let key = rotate(member.as_ref(), ctx.cluster, &account)?;
    writeln!(
        ctx.streams.out,
        "Rotated credentials of {} for Account CR {}: new access key {}",
        key.user_name, account.metadata.name, key.access_key_id
    )?;
    Ok(())
}

/// Replace the admin user's access keys and store the new one in the
/// account's IAM user secret.
pub fn rotate(client: &dyn Client, cluster: &dyn Cluster, account: &Account) -> Result<AccessKey> {
    let user = collect_pages(|marker| client.list_users(marker))?
        .into_iter()
        .find(|u| u.starts_with(ADMIN_USER_PREFIX))
        .with_context(|| format!("no {} IAM user in account {}", ADMIN_USER_PREFIX, account.spec.aws_account_id))?;

    let mut old_keys = collect_pages(|marker| client.list_access_keys(&user, marker))?;
    debug!(user = %user, keys = old_keys.len(), "Existing access keys");

    if old_keys.len() >= MAX_ACCESS_KEYS {
        let inactive: Vec<String> = old_keys
            .iter()
            .filter(|k| k.status != "Active")
            .map(|k| k.access_key_id.clone())
            .collect();
        if inactive.is_empty() {
            bail!("IAM user {} already has {} active access keys", user, MAX_ACCESS_KEYS);
        }
        for id in &inactive {
            info!(user = %user, key = %id, "Deleting inactive access key");
            client.delete_access_key(&user, id)?;
        }
        old_keys.retain(|k| !inactive.contains(&k.access_key_id));
    }

    let key = client.create_access_key(&user)?;

    let mut data = BTreeMap::new();
    data.insert("aws_user_name".to_string(), key.user_name.clone());
    data.insert("aws_access_key_id".to_string(), key.access_key_id.clone());
    data.insert("aws_secret_access_key".to_string(), key.secret_access_key.clone());
    cluster.apply_secret(&Secret::new(
        ACCOUNT_NAMESPACE,
        &account.iam_user_secret_name(),
        data,
    ))?;

    // Only drop the old keys once the new one is stored.
    for old in &old_keys {
        info!(user = %user, key = %old.access_key_id, "Deleting old access key");
        client.delete_access_key(&user, &old.access_key_id)?;
    }

    cluster.patch_account_status(
        &account.metadata.name,
        &json!({ "status": { "rotateCredentials": true } }),
    )?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::fake::{BuildCall, FakeClient, RecordingBuilder};
    use crate::aws::iam::AccessKeyMetadata;
    use crate::cmd::testing::run_args;
    use crate::k8s::fake::{account, FakeCluster, Patch};

    const USER: &str = "osdManagedAdmin-xyz";

    fn key(id: &str, status: &str) -> AccessKeyMetadata {
        AccessKeyMetadata {
            access_key_id: id.to_string(),
            status: status.to_string(),
        }
    }

    fn client(keys: Vec<AccessKeyMetadata>) -> FakeClient {
        let client = FakeClient {
            users: vec!["someone-else".to_string(), USER.to_string()],
            ..FakeClient::default()
        };
        client.access_keys.borrow_mut().insert(USER.to_string(), keys);
        client
    }

    fn cluster() -> FakeCluster {
        FakeCluster {
            accounts: vec![account("osd-creds-mgmt-aaa", "123456789012", "Ready", true)],
            ..FakeCluster::default()
        }
    }

    #[test]
    fn test_rotate_replaces_old_key() {
        let client = client(vec![key("AKIAOLD", "Active")]);
        let cluster = cluster();
        let account = cluster.accounts[0].clone();

        let new_key = rotate(&client, &cluster, &account).unwrap();

        assert_eq!(new_key.user_name, USER);
        let remaining = client.access_keys.borrow()[USER].clone();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].access_key_id, new_key.access_key_id);

        let applied = cluster.applied.borrow();
        assert_eq!(applied[0].metadata.name, "osd-creds-mgmt-aaa-secret");
        assert_eq!(applied[0].string_data["aws_access_key_id"], new_key.access_key_id);
        assert_eq!(applied[0].string_data["aws_secret_access_key"], "new-secret");
        assert_eq!(applied[0].string_data["aws_user_name"], USER);

        assert_eq!(
            *cluster.patches.borrow(),
            vec![Patch::Status(
                "osd-creds-mgmt-aaa".to_string(),
                json!({"status": {"rotateCredentials": true}})
            )]
        );
    }

    #[test]
    fn test_rotate_makes_room_by_dropping_inactive_keys() {
        let client = client(vec![key("AKIAOLD", "Active"), key("AKIADEAD", "Inactive")]);
        let cluster = cluster();

        rotate(&client, &cluster, &cluster.accounts[0]).unwrap();
        assert_eq!(client.access_keys.borrow()[USER].len(), 1);
    }

    #[test]
    fn test_rotate_refuses_two_active_keys() {
        let client = client(vec![key("AKIA1", "Active"), key("AKIA2", "Active")]);
        let cluster = cluster();

        let err = rotate(&client, &cluster, &cluster.accounts[0]).unwrap_err();
        assert!(err.to_string().contains("already has 2 active access keys"));
        assert!(cluster.applied.borrow().is_empty());
    }

    #[test]
    fn test_rotate_without_admin_user() {
        let client = FakeClient::default();
        let cluster = cluster();

        let err = rotate(&client, &cluster, &cluster.accounts[0]).unwrap_err();
        assert!(err.to_string().contains("no osdManagedAdmin IAM user"));
    }

    #[test]
    fn test_command_uses_assumed_role_credentials() {
        let builder = RecordingBuilder::new(|| client(vec![key("AKIAOLD", "Active")]));
        let cluster = cluster();
        let (result, out) = run_args(
            &["osd-utils-cli", "account", "rotate-secret", "osd-creds-mgmt-aaa", "-a", "AKIA", "-x", "secret"],
            &builder,
            &cluster,
            "",
        );
        result.unwrap();

        let calls = builder.calls.borrow();
        assert_eq!(calls.len(), 2);
        match &calls[1] {
            BuildCall::Input(input) => {
                assert_eq!(input.access_key_id, "ASIATEMP");
                assert_eq!(input.session_token.as_deref(), Some("token-osd-utils-cli"));
            }
            other => panic!("unexpected build call {:?}", other),
        }
        assert!(out.contents().contains("new access key AKIANEW1"));
        assert_eq!(cluster.applied.borrow().len(), 1);
    }
}
