//! EC2 snapshot actions (query protocol)

use super::client::Page;
use super::error::Result;
use super::transport::{Endpoint, Transport};
use super::xml;

const VERSION: &str = "2016-11-15";

/// Snapshot ids owned by the caller that carry `tag_key`.
pub(crate) fn describe_snapshots(
    t: &Transport,
    tag_key: &str,
    next_token: Option<&str>,
) -> Result<Page<String>> {
    let mut params = vec![
        ("Owner.1", "self"),
        ("Filter.1.Name", "tag-key"),
        ("Filter.1.Value.1", tag_key),
    ];
    if let Some(token) = next_token {
        params.push(("NextToken", token));
    }

    let body = t.query(
        &Endpoint::regional("ec2", t.region()),
        "DescribeSnapshots",
        VERSION,
        &params,
    )?;

    Ok(Page {
        items: xml::all(&body, "snapshotId"),
        next_token: xml::first(&body, "nextToken").filter(|t| !t.is_empty()),
    })
}

pub(crate) fn delete_snapshot(t: &Transport, snapshot_id: &str) -> Result<()> {
    t.query(
        &Endpoint::regional("ec2", t.region()),
        "DeleteSnapshot",
        VERSION,
        &[("SnapshotId", snapshot_id)],
    )?;
    Ok(())
}
