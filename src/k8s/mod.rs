//! Access to the AWS account operator's resources on the management cluster

mod kubectl;
pub mod types;

#[cfg(test)]
pub mod fake;

use serde_json::Value;
use thiserror::Error;

pub use kubectl::KubectlCluster;
pub use types::{Account, AccountClaim, Secret, ACCOUNT_NAMESPACE};

/// Error type for cluster operations.
#[derive(Debug, Error)]
pub enum Error {
    /// kubectl could not be started or fed.
    #[error("failed to run kubectl: {0}")]
    Spawn(#[from] std::io::Error),

    /// kubectl exited with a non-zero code.
    #[error("kubectl exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    /// The requested object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// kubectl output was not the expected JSON.
    #[error("failed to parse kubectl output: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Operations on Account/AccountClaim CRs and their secrets
pub trait Cluster {
    fn list_accounts(&self) -> Result<Vec<Account>>;

    fn get_account(&self, name: &str) -> Result<Account>;

    fn list_account_claims(&self) -> Result<Vec<AccountClaim>>;

    fn get_account_claim(&self, namespace: &str, name: &str) -> Result<AccountClaim>;

    /// Merge patch on the Account object.
    fn patch_account(&self, name: &str, patch: &Value) -> Result<()>;

    /// Merge patch on the Account status subresource.
    fn patch_account_status(&self, name: &str, patch: &Value) -> Result<()>;

    fn list_secret_names(&self, namespace: &str) -> Result<Vec<String>>;

    /// Create or update a secret.
    fn apply_secret(&self, secret: &Secret) -> Result<()>;

    /// Delete a secret; missing secrets are not an error.
    fn delete_secret(&self, namespace: &str, name: &str) -> Result<()>;
}

/// Find the Account CR for an AWS account id.
pub fn find_account_by_aws_id(cluster: &dyn Cluster, aws_account_id: &str) -> Result<Account> {
    cluster
        .list_accounts()?
        .into_iter()
        .find(|a| a.spec.aws_account_id == aws_account_id)
        .ok_or_else(|| Error::NotFound(format!("no Account CR for AWS account {}", aws_account_id)))
}
