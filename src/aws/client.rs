//! The AWS client used by commands, and how it gets built

use std::path::Path;
use tracing::debug;

use super::cost_explorer::{
    self, CostCategoryDefinition, CostCategoryReference, GetCostAndUsageRequest,
    GetCostAndUsageResponse,
};
use super::error::Result;
use super::iam::{self, AccessKey, AccessKeyMetadata};
use super::organizations::{self, Account, OrganizationalUnit};
use super::sts::{self, AssumedRole};
use super::transport::Transport;
use super::{ec2, Credentials};

/// One page of a list-style call
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

/// Follow pagination tokens until the last page and return every item.
pub fn collect_pages<T, F>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<&str>) -> Result<Page<T>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = fetch(token.as_deref())?;
        items.extend(page.items);
        match page.next_token {
            Some(next) if !next.is_empty() => token = Some(next),
            _ => break,
        }
    }

    Ok(items)
}

/// AWS operations used by the commands
pub trait Client {
    /// Region requests are made in.
    fn region(&self) -> &str;

    fn describe_organizational_unit(&self, ou_id: &str) -> Result<OrganizationalUnit>;

    fn list_organizational_units_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<OrganizationalUnit>>;

    fn list_accounts_for_parent(&self, parent_id: &str, next_token: Option<&str>) -> Result<Page<Account>>;

    fn get_cost_and_usage(&self, request: &GetCostAndUsageRequest) -> Result<GetCostAndUsageResponse>;

    fn list_cost_category_definitions(&self, next_token: Option<&str>) -> Result<Page<CostCategoryReference>>;

    /// Returns the ARN of the new cost category.
    fn create_cost_category_definition(&self, definition: &CostCategoryDefinition) -> Result<String>;

    fn assume_role(&self, role_arn: &str, session_name: &str, duration_seconds: u32) -> Result<AssumedRole>;

    /// Exchange temporary credentials for a console sign-in token.
    fn get_signin_token(&self, credentials: &Credentials, duration_seconds: u32) -> Result<String>;

    fn list_users(&self, marker: Option<&str>) -> Result<Page<String>>;

    fn list_access_keys(&self, user_name: &str, marker: Option<&str>) -> Result<Page<AccessKeyMetadata>>;

    fn create_access_key(&self, user_name: &str) -> Result<AccessKey>;

    fn delete_access_key(&self, user_name: &str, access_key_id: &str) -> Result<()>;

    fn describe_snapshots(&self, tag_key: &str, next_token: Option<&str>) -> Result<Page<String>>;

    fn delete_snapshot(&self, snapshot_id: &str) -> Result<()>;
}

/// Client backed by signed HTTPS requests
pub struct AwsClient {
    transport: Transport,
}

impl AwsClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(credentials)?,
        })
    }
}

impl Client for AwsClient {
    fn region(&self) -> &str {
        self.transport.region()
    }

    fn describe_organizational_unit(&self, ou_id: &str) -> Result<OrganizationalUnit> {
        organizations::describe_organizational_unit(&self.transport, ou_id)
    }

    fn list_organizational_units_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<OrganizationalUnit>> {
        organizations::list_organizational_units_for_parent(&self.transport, parent_id, next_token)
    }

    fn list_accounts_for_parent(&self, parent_id: &str, next_token: Option<&str>) -> Result<Page<Account>> {
        organizations::list_accounts_for_parent(&self.transport, parent_id, next_token)
    }

    fn get_cost_and_usage(&self, request: &GetCostAndUsageRequest) -> Result<GetCostAndUsageResponse> {
        cost_explorer::get_cost_and_usage(&self.transport, request)
    }

    fn list_cost_category_definitions(&self, next_token: Option<&str>) -> Result<Page<CostCategoryReference>> {
        cost_explorer::list_cost_category_definitions(&self.transport, next_token)
    }

    fn create_cost_category_definition(&self, definition: &CostCategoryDefinition) -> Result<String> {
        cost_explorer::create_cost_category_definition(&self.transport, definition)
    }

    fn assume_role(&self, role_arn: &str, session_name: &str, duration_seconds: u32) -> Result<AssumedRole> {
        sts::assume_role(&self.transport, role_arn, session_name, duration_seconds)
    }

    fn get_signin_token(&self, credentials: &Credentials, duration_seconds: u32) -> Result<String> {
        sts::get_signin_token(credentials, duration_seconds)
    }

    fn list_users(&self, marker: Option<&str>) -> Result<Page<String>> {
        iam::list_users(&self.transport, marker)
    }

    fn list_access_keys(&self, user_name: &str, marker: Option<&str>) -> Result<Page<AccessKeyMetadata>> {
        iam::list_access_keys(&self.transport, user_name, marker)
    }

    fn create_access_key(&self, user_name: &str) -> Result<AccessKey> {
        iam::create_access_key(&self.transport, user_name)
    }

    fn delete_access_key(&self, user_name: &str, access_key_id: &str) -> Result<()> {
        iam::delete_access_key(&self.transport, user_name, access_key_id)
    }

    fn describe_snapshots(&self, tag_key: &str, next_token: Option<&str>) -> Result<Page<String>> {
        ec2::describe_snapshots(&self.transport, tag_key, next_token)
    }

    fn delete_snapshot(&self, snapshot_id: &str) -> Result<()> {
        ec2::delete_snapshot(&self.transport, snapshot_id)
    }
}

/// Explicit credentials for building a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsClientInput {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
}

impl From<&Credentials> for AwsClientInput {
    fn from(credentials: &Credentials) -> Self {
        Self {
            access_key_id: credentials.access_key_id.clone(),
            secret_access_key: credentials.secret_access_key.clone(),
            session_token: credentials.session_token.clone(),
            region: credentials.region.clone(),
        }
    }
}

/// Constructs clients; substituted in tests.
pub trait ClientBuilder {
    /// Client from a named profile, an optional config file and the environment.
    fn new_aws_client(&self, profile: &str, region: &str, config_file: &str) -> Result<Box<dyn Client>>;

    /// Client from an explicit key pair.
    fn new_aws_client_with_input(&self, input: &AwsClientInput) -> Result<Box<dyn Client>>;
}

/// Builds [`AwsClient`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClientBuilder;

impl ClientBuilder for DefaultClientBuilder {
    fn new_aws_client(&self, profile: &str, region: &str, config_file: &str) -> Result<Box<dyn Client>> {
        let config_file = (!config_file.is_empty()).then(|| Path::new(config_file));
        let credentials = Credentials::load(profile, region, config_file)?;
        debug!("Loaded credentials for region: {}", credentials.region);
        Ok(Box::new(AwsClient::new(credentials)?))
    }

    fn new_aws_client_with_input(&self, input: &AwsClientInput) -> Result<Box<dyn Client>> {
        let credentials = Credentials {
            access_key_id: input.access_key_id.clone(),
            secret_access_key: input.secret_access_key.clone(),
            session_token: input.session_token.clone(),
            region: input.region.clone(),
        };
        Ok(Box::new(AwsClient::new(credentials)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::Error;

    #[test]
    fn test_collect_pages_follows_tokens() {
        let mut seen = Vec::new();
        let items = collect_pages(|token| {
            seen.push(token.map(str::to_string));
            Ok(match token {
                None => Page {
                    items: vec![1, 2],
                    next_token: Some("a".to_string()),
                },
                Some("a") => Page {
                    items: vec![3],
                    next_token: Some(String::new()),
                },
                Some(other) => panic!("unexpected token {}", other),
            })
        })
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(seen, vec![None, Some("a".to_string())]);
    }

    #[test]
    fn test_collect_pages_stops_on_error() {
        let result: Result<Vec<u8>> = collect_pages(|_| Err(Error::Credentials("boom".to_string())));
        assert!(result.is_err());
    }
}
