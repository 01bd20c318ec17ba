//! AWS Organizations API (JSON 1.1 protocol)

use serde::{Deserialize, Serialize};

use super::client::Page;
use super::error::Result;
use super::transport::{Endpoint, Transport};

const TARGET_PREFIX: &str = "AWSOrganizationsV20161128";

fn endpoint() -> Endpoint {
    Endpoint::global("organizations", "organizations.us-east-1.amazonaws.com")
}

/// An Organizations grouping container for accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrganizationalUnit {
    pub id: String,
    #[serde(default)]
    pub arn: String,
    #[serde(default)]
    pub name: String,
}

/// A member account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub arn: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeOrganizationalUnitRequest<'a> {
    organizational_unit_id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeOrganizationalUnitResponse {
    organizational_unit: OrganizationalUnit,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ListForParentRequest<'a> {
    parent_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListOrganizationalUnitsResponse {
    #[serde(default)]
    organizational_units: Vec<OrganizationalUnit>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListAccountsResponse {
    #[serde(default)]
    accounts: Vec<Account>,
    next_token: Option<String>,
}

pub(crate) fn describe_organizational_unit(t: &Transport, ou_id: &str) -> Result<OrganizationalUnit> {
    let response: DescribeOrganizationalUnitResponse = t.json(
        &endpoint(),
        TARGET_PREFIX,
        "DescribeOrganizationalUnit",
        &DescribeOrganizationalUnitRequest {
            organizational_unit_id: ou_id,
        },
    )?;
    Ok(response.organizational_unit)
}

pub(crate) fn list_organizational_units_for_parent(
    t: &Transport,
    parent_id: &str,
    next_token: Option<&str>,
) -> Result<Page<OrganizationalUnit>> {
    let response: ListOrganizationalUnitsResponse = t.json(
        &endpoint(),
        TARGET_PREFIX,
        "ListOrganizationalUnitsForParent",
        &ListForParentRequest {
            parent_id,
            next_token,
        },
    )?;
    Ok(Page {
        items: response.organizational_units,
        next_token: response.next_token,
    })
}

pub(crate) fn list_accounts_for_parent(
    t: &Transport,
    parent_id: &str,
    next_token: Option<&str>,
) -> Result<Page<Account>> {
    let response: ListAccountsResponse = t.json(
        &endpoint(),
        TARGET_PREFIX,
        "ListAccountsForParent",
        &ListForParentRequest {
            parent_id,
            next_token,
        },
    )?;
    Ok(Page {
        items: response.accounts,
        next_token: response.next_token,
    })
}
