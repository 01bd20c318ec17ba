//! In-memory [`Client`] for command tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::client::{AwsClientInput, Client, ClientBuilder, Page};
use super::cost_explorer::{
    CostCategoryDefinition, CostCategoryReference, GetCostAndUsageRequest, GetCostAndUsageResponse,
    MetricValue, ResultByTime, COST_METRIC,
};
use super::error::{Error, Result};
use super::iam::{AccessKey, AccessKeyMetadata};
use super::organizations::{Account, OrganizationalUnit};
use super::sts::AssumedRole;
use super::Credentials;

/// Organization tree, costs and IAM state. Lists are served one item per page
/// so callers must follow pagination tokens.
#[derive(Default)]
pub struct FakeClient {
    pub ous: HashMap<String, OrganizationalUnit>,
    pub child_ous: HashMap<String, Vec<String>>,
    pub accounts: HashMap<String, Vec<Account>>,
    pub account_costs: HashMap<String, f64>,
    pub categories: RefCell<Vec<CostCategoryReference>>,
    pub created_categories: RefCell<Vec<CostCategoryDefinition>>,
    pub cost_requests: RefCell<Vec<GetCostAndUsageRequest>>,
    pub users: Vec<String>,
    pub access_keys: RefCell<HashMap<String, Vec<AccessKeyMetadata>>>,
    pub assumed_roles: RefCell<Vec<String>>,
    pub snapshots: RefCell<Vec<String>>,
    pub deleted_snapshots: RefCell<Vec<String>>,
    /// ListAccountsForParent calls that started a new listing (no token).
    pub account_listings: Cell<usize>,
    /// Snapshot ids whose delete is refused.
    pub undeletable_snapshots: Vec<String>,
}

fn page<T: Clone>(items: &[T], token: Option<&str>) -> Page<T> {
    let index: usize = token.and_then(|t| t.parse().ok()).unwrap_or(0);
    Page {
        items: items.get(index).cloned().into_iter().collect(),
        next_token: (index + 1 < items.len()).then(|| (index + 1).to_string()),
    }
}

fn not_found(action: &str, what: &str) -> Error {
    Error::Api {
        service: "fake",
        action: action.to_string(),
        status: 400,
        code: "NotFoundException".to_string(),
        message: format!("{} not found", what),
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an OU under `parent` with `(id, cost)` accounts.
    pub fn with_ou(mut self, parent: Option<&str>, id: &str, name: &str, accounts: &[(&str, f64)]) -> Self {
        self.ous.insert(
            id.to_string(),
            OrganizationalUnit {
                id: id.to_string(),
                arn: format!("arn:aws:organizations::0:ou/o-1/{}", id),
                name: name.to_string(),
            },
        );
        if let Some(parent) = parent {
            self.child_ous
                .entry(parent.to_string())
                .or_default()
                .push(id.to_string());
        }
        let list = self.accounts.entry(id.to_string()).or_default();
        for (account_id, cost) in accounts {
            list.push(Account {
                id: account_id.to_string(),
                arn: String::new(),
                name: format!("account-{}", account_id),
                email: String::new(),
                status: Some("ACTIVE".to_string()),
            });
            self.account_costs.insert(account_id.to_string(), *cost);
        }
        self
    }

    pub fn with_category(self, name: &str) -> Self {
        self.categories.borrow_mut().push(CostCategoryReference {
            cost_category_arn: format!("arn:aws:ce::0:costcategory/{}", name),
            name: name.to_string(),
        });
        self
    }
}

impl Client for FakeClient {
    fn region(&self) -> &str {
        "us-east-1"
    }

    fn describe_organizational_unit(&self, ou_id: &str) -> Result<OrganizationalUnit> {
        self.ous
            .get(ou_id)
            .cloned()
            .ok_or_else(|| not_found("DescribeOrganizationalUnit", ou_id))
    }

    fn list_organizational_units_for_parent(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<OrganizationalUnit>> {
        let children: Vec<OrganizationalUnit> = self
            .child_ous
            .get(parent_id)
            .map(|ids| ids.iter().filter_map(|id| self.ous.get(id).cloned()).collect())
            .unwrap_or_default();
        Ok(page(&children, next_token))
    }

    fn list_accounts_for_parent(&self, parent_id: &str, next_token: Option<&str>) -> Result<Page<Account>> {
        if next_token.is_none() {
            self.account_listings.set(self.account_listings.get() + 1);
        }
        let accounts = self.accounts.get(parent_id).cloned().unwrap_or_default();
        Ok(page(&accounts, next_token))
    }

    fn get_cost_and_usage(&self, request: &GetCostAndUsageRequest) -> Result<GetCostAndUsageResponse> {
        self.cost_requests.borrow_mut().push(request.clone());
        let amount: f64 = request
            .filter
            .as_ref()
            .map(|f| {
                f.dimensions
                    .values
                    .iter()
                    .filter_map(|id| self.account_costs.get(id))
                    .sum()
            })
            .unwrap_or(0.0);

        let mut total = HashMap::new();
        total.insert(
            COST_METRIC.to_string(),
            MetricValue {
                amount: amount.to_string(),
                unit: Some("USD".to_string()),
            },
        );

        Ok(GetCostAndUsageResponse {
            results_by_time: vec![ResultByTime {
                time_period: request.time_period.clone(),
                total: Some(total),
                estimated: false,
            }],
            next_page_token: None,
        })
    }

    fn list_cost_category_definitions(&self, next_token: Option<&str>) -> Result<Page<CostCategoryReference>> {
        Ok(page(&self.categories.borrow(), next_token))
    }

    fn create_cost_category_definition(&self, definition: &CostCategoryDefinition) -> Result<String> {
        self.created_categories.borrow_mut().push(definition.clone());
        let arn = format!("arn:aws:ce::0:costcategory/{}", definition.name);
        self.categories.borrow_mut().push(CostCategoryReference {
            cost_category_arn: arn.clone(),
            name: definition.name.clone(),
        });
        Ok(arn)
    }

    fn assume_role(&self, role_arn: &str, session_name: &str, _duration_seconds: u32) -> Result<AssumedRole> {
        self.assumed_roles.borrow_mut().push(role_arn.to_string());
        Ok(AssumedRole {
            credentials: Credentials {
                access_key_id: "ASIATEMP".to_string(),
                secret_access_key: "temp-secret".to_string(),
                session_token: Some(format!("token-{}", session_name)),
                region: "us-east-1".to_string(),
            },
            expiration: Some("2026-10-15T12:00:00Z".to_string()),
        })
    }

    fn get_signin_token(&self, credentials: &Credentials, duration_seconds: u32) -> Result<String> {
        Ok(format!("signin-{}-{}", credentials.access_key_id, duration_seconds))
    }

    fn list_users(&self, marker: Option<&str>) -> Result<Page<String>> {
        Ok(page(&self.users, marker))
    }

    fn list_access_keys(&self, user_name: &str, marker: Option<&str>) -> Result<Page<AccessKeyMetadata>> {
        let keys = self
            .access_keys
            .borrow()
            .get(user_name)
            .cloned()
            .unwrap_or_default();
        Ok(page(&keys, marker))
    }

    fn create_access_key(&self, user_name: &str) -> Result<AccessKey> {
        let mut keys = self.access_keys.borrow_mut();
        let list = keys.entry(user_name.to_string()).or_default();
        let access_key_id = format!("AKIANEW{}", list.len());
        list.push(AccessKeyMetadata {
            access_key_id: access_key_id.clone(),
            status: "Active".to_string(),
        });
        Ok(AccessKey {
            user_name: user_name.to_string(),
            access_key_id,
            secret_access_key: "new-secret".to_string(),
        })
    }

    fn delete_access_key(&self, user_name: &str, access_key_id: &str) -> Result<()> {
        if let Some(list) = self.access_keys.borrow_mut().get_mut(user_name) {
            list.retain(|k| k.access_key_id != access_key_id);
        }
        Ok(())
    }

    fn describe_snapshots(&self, _tag_key: &str, next_token: Option<&str>) -> Result<Page<String>> {
        Ok(page(&self.snapshots.borrow(), next_token))
    }

    fn delete_snapshot(&self, snapshot_id: &str) -> Result<()> {
        if self.undeletable_snapshots.iter().any(|id| id == snapshot_id) {
            return Err(Error::Api {
                service: "ec2",
                action: "DeleteSnapshot".to_string(),
                status: 400,
                code: "InvalidSnapshot.InUse".to_string(),
                message: format!("The snapshot {} is currently in use", snapshot_id),
            });
        }
        self.deleted_snapshots.borrow_mut().push(snapshot_id.to_string());
        Ok(())
    }
}

/// Which construction path was taken, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildCall {
    Profile {
        profile: String,
        region: String,
        config_file: String,
    },
    Input(AwsClientInput),
}

/// Records construction calls and hands out clients from a factory closure.
pub struct RecordingBuilder<F: Fn() -> FakeClient> {
    pub calls: RefCell<Vec<BuildCall>>,
    make: F,
    fail: Option<fn() -> Error>,
}

impl<F: Fn() -> FakeClient> RecordingBuilder<F> {
    pub fn new(make: F) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            make,
            fail: None,
        }
    }

    /// Every construction records its call and then fails with `fail()`.
    pub fn failing(mut self, fail: fn() -> Error) -> Self {
        self.fail = Some(fail);
        self
    }

    fn build(&self) -> Result<Box<dyn Client>> {
        match self.fail {
            Some(fail) => Err(fail()),
            None => Ok(Box::new((self.make)())),
        }
    }
}

impl RecordingBuilder<fn() -> FakeClient> {
    pub fn empty() -> Self {
        Self::new(FakeClient::new)
    }
}

impl<F: Fn() -> FakeClient> ClientBuilder for RecordingBuilder<F> {
    fn new_aws_client(&self, profile: &str, region: &str, config_file: &str) -> Result<Box<dyn Client>> {
        self.calls.borrow_mut().push(BuildCall::Profile {
            profile: profile.to_string(),
            region: region.to_string(),
            config_file: config_file.to_string(),
        });
        self.build()
    }

    fn new_aws_client_with_input(&self, input: &AwsClientInput) -> Result<Box<dyn Client>> {
        self.calls.borrow_mut().push(BuildCall::Input(input.clone()));
        self.build()
    }
}
