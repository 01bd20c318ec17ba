//! IAM user and access key actions (query protocol)

use super::client::Page;
use super::error::{Error, Result};
use super::transport::{Endpoint, Transport};
use super::xml;

const VERSION: &str = "2010-05-08";

fn endpoint() -> Endpoint {
    Endpoint::global("iam", "iam.amazonaws.com")
}

/// Metadata of an existing access key
#[derive(Debug, Clone, PartialEq)]
pub struct AccessKeyMetadata {
    pub access_key_id: String,
    pub status: String,
}

/// A newly created access key, including its secret
#[derive(Debug, Clone)]
pub struct AccessKey {
    pub user_name: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

fn marker_param(marker: Option<&str>) -> Vec<(&str, &str)> {
    marker.map(|m| vec![("Marker", m)]).unwrap_or_default()
}

/// Next page marker, only when the response says it is truncated.
fn next_marker(body: &str) -> Option<String> {
    match xml::first(body, "IsTruncated").as_deref() {
        Some("true") => xml::first(body, "Marker"),
        _ => None,
    }
}

pub(crate) fn list_users(t: &Transport, marker: Option<&str>) -> Result<Page<String>> {
    let body = t.query(&endpoint(), "ListUsers", VERSION, &marker_param(marker))?;
    Ok(Page {
        items: xml::all(&body, "UserName"),
        next_token: next_marker(&body),
    })
}

pub(crate) fn list_access_keys(
    t: &Transport,
    user_name: &str,
    marker: Option<&str>,
) -> Result<Page<AccessKeyMetadata>> {
    let mut params = vec![("UserName", user_name)];
    params.extend(marker_param(marker));
    let body = t.query(&endpoint(), "ListAccessKeys", VERSION, &params)?;

    Ok(Page {
        items: parse_access_keys(&body),
        next_token: next_marker(&body),
    })
}

fn parse_access_keys(body: &str) -> Vec<AccessKeyMetadata> {
    xml::blocks(body, "member")
        .into_iter()
        .filter_map(|member| {
            Some(AccessKeyMetadata {
                access_key_id: xml::first(member, "AccessKeyId")?,
                status: xml::first(member, "Status").unwrap_or_default(),
            })
        })
        .collect()
}

pub(crate) fn create_access_key(t: &Transport, user_name: &str) -> Result<AccessKey> {
    let body = t.query(&endpoint(), "CreateAccessKey", VERSION, &[("UserName", user_name)])?;

    let field = |name: &str| {
        xml::first(&body, name).ok_or_else(|| Error::Decode {
            service: "iam",
            action: "CreateAccessKey".to_string(),
            reason: format!("missing {}", name),
        })
    };

    Ok(AccessKey {
        user_name: user_name.to_string(),
        access_key_id: field("AccessKeyId")?,
        secret_access_key: field("SecretAccessKey")?,
    })
}

pub(crate) fn delete_access_key(t: &Transport, user_name: &str, access_key_id: &str) -> Result<()> {
    t.query(
        &endpoint(),
        "DeleteAccessKey",
        VERSION,
        &[("UserName", user_name), ("AccessKeyId", access_key_id)],
    )?;
    Ok(())
}
