//! Custom resources of the AWS account operator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ACCOUNT_RESOURCE: &str = "accounts.aws.managed.openshift.io";
pub const ACCOUNT_CLAIM_RESOURCE: &str = "accountclaims.aws.managed.openshift.io";

/// Namespace holding Account CRs and their secrets
pub const ACCOUNT_NAMESPACE: &str = "aws-account-operator";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalEntity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSpec {
    #[serde(rename = "awsAccountID", default)]
    pub aws_account_id: String,
    #[serde(default)]
    pub iam_user_secret: String,
    #[serde(default)]
    pub claim_link: String,
    #[serde(default)]
    pub claim_link_namespace: String,
    #[serde(default)]
    pub legal_entity: LegalEntity,
    #[serde(default)]
    pub byoc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatus {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub claimed: bool,
    #[serde(default)]
    pub reused: bool,
    #[serde(default)]
    pub rotate_credentials: bool,
    #[serde(default)]
    pub rotate_console_credentials: bool,
}

/// Account CR: one AWS account in the operator's pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: AccountSpec,
    #[serde(default)]
    pub status: AccountStatus,
}

impl Account {
    /// Name of the secret holding the IAM user credentials.
    pub fn iam_user_secret_name(&self) -> String {
        if self.spec.iam_user_secret.is_empty() {
            format!("{}-secret", self.metadata.name)
        } else {
            self.spec.iam_user_secret.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountClaimSpec {
    #[serde(default)]
    pub account_link: String,
    #[serde(default)]
    pub legal_entity: LegalEntity,
    #[serde(default)]
    pub byoc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountClaimStatus {
    #[serde(default)]
    pub state: String,
}

/// AccountClaim CR: a cluster's request for an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountClaim {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: AccountClaimSpec,
    #[serde(default)]
    pub status: AccountClaimStatus,
}

/// Opaque secret, written through `stringData`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    #[serde(default = "secret_api_version")]
    pub api_version: String,
    #[serde(default = "secret_kind")]
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub string_data: BTreeMap<String, String>,
}

fn secret_api_version() -> String {
    "v1".to_string()
}

fn secret_kind() -> String {
    "Secret".to_string()
}

impl Secret {
    pub fn new(namespace: &str, name: &str, string_data: BTreeMap<String, String>) -> Self {
        Self {
            api_version: secret_api_version(),
            kind: secret_kind(),
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: namespace.to_string(),
                creation_timestamp: None,
            },
            string_data,
        }
    }
}

/// `kubectl get -o json` list wrapper
#[derive(Debug, Deserialize)]
pub struct List<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}
