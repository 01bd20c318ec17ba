//! In-memory [`Cluster`] for command tests.

use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeSet;

use super::types::{Account, AccountClaim, AccountSpec, AccountStatus, ObjectMeta, Secret};
use super::{Cluster, Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Object(String, Value),
    Status(String, Value),
}

#[derive(Default)]
pub struct FakeCluster {
    pub accounts: Vec<Account>,
    pub claims: Vec<AccountClaim>,
    pub secrets: RefCell<BTreeSet<(String, String)>>,
    pub patches: RefCell<Vec<Patch>>,
    pub applied: RefCell<Vec<Secret>>,
}

pub fn account(name: &str, aws_id: &str, state: &str, claimed: bool) -> Account {
    Account {
        metadata: ObjectMeta {
            name: name.to_string(),
            namespace: super::ACCOUNT_NAMESPACE.to_string(),
            creation_timestamp: None,
        },
        spec: AccountSpec {
            aws_account_id: aws_id.to_string(),
            ..AccountSpec::default()
        },
        status: AccountStatus {
            state: state.to_string(),
            claimed,
            ..AccountStatus::default()
        },
    }
}

impl FakeCluster {
    pub fn with_secret(self, namespace: &str, name: &str) -> Self {
        self.secrets
            .borrow_mut()
            .insert((namespace.to_string(), name.to_string()));
        self
    }

    pub fn has_secret(&self, namespace: &str, name: &str) -> bool {
        self.secrets
            .borrow()
            .contains(&(namespace.to_string(), name.to_string()))
    }
}

impl Cluster for FakeCluster {
    fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.clone())
    }

    fn get_account(&self, name: &str) -> Result<Account> {
        self.accounts
            .iter()
            .find(|a| a.metadata.name == name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("accounts \"{}\" not found", name)))
    }

    fn list_account_claims(&self) -> Result<Vec<AccountClaim>> {
        Ok(self.claims.clone())
    }

    fn get_account_claim(&self, namespace: &str, name: &str) -> Result<AccountClaim> {
        self.claims
            .iter()
            .find(|c| c.metadata.name == name && c.metadata.namespace == namespace)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("accountclaims \"{}\" not found", name)))
    }

    fn patch_account(&self, name: &str, patch: &Value) -> Result<()> {
        self.patches
            .borrow_mut()
            .push(Patch::Object(name.to_string(), patch.clone()));
        Ok(())
    }

    fn patch_account_status(&self, name: &str, patch: &Value) -> Result<()> {
        self.patches
            .borrow_mut()
            .push(Patch::Status(name.to_string(), patch.clone()));
        Ok(())
    }

    fn list_secret_names(&self, namespace: &str) -> Result<Vec<String>> {
        Ok(self
            .secrets
            .borrow()
            .iter()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, name)| name.clone())
            .collect())
    }

    fn apply_secret(&self, secret: &Secret) -> Result<()> {
        self.secrets.borrow_mut().insert((
            secret.metadata.namespace.clone(),
            secret.metadata.name.clone(),
        ));
        self.applied.borrow_mut().push(secret.clone());
        Ok(())
    }

    fn delete_secret(&self, namespace: &str, name: &str) -> Result<()> {
        self.secrets
            .borrow_mut()
            .remove(&(namespace.to_string(), name.to_string()));
        Ok(())
    }
}
