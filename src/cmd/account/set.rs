//! `account set`: merge-patch fields of an Account CR's status

use anyhow::Result;
use clap::Args;
use serde_json::{json, Map, Value};
use std::io::Write;

use crate::cmd::{command_path, Context};
use crate::error::Error;

#[derive(Args, Debug)]
pub struct SetOptions {
    /// Account CR name
    pub account_name: String,

    /// Status state
    #[arg(long)]
    pub state: Option<String>,

    /// Status claimed
    #[arg(long)]
    pub claimed: Option<bool>,

    /// Status reused
    #[arg(long)]
    pub reused: Option<bool>,
}

impl SetOptions {
    fn status_patch(&self) -> Option<Value> {
        let mut status = Map::new();
        if let Some(state) = &self.state {
            status.insert("state".to_string(), json!(state));
        }
        if let Some(claimed) = self.claimed {
            status.insert("claimed".to_string(), json!(claimed));
        }
        if let Some(reused) = self.reused {
            status.insert("reused".to_string(), json!(reused));
        }

        (!status.is_empty()).then(|| json!({ "status": status }))
    }
}

pub fn run(ops: &SetOptions, ctx: &mut Context) -> Result<()> {
    let Some(patch) = ops.status_patch() else {
        return Err(Error::usage(
            &command_path(&["account", "set"]),
            "At least one of --state, --claimed or --reused is required",
        )
        .into());
    };

    ctx.cluster.patch_account_status(&ops.account_name, &patch)?;
    writeln!(ctx.streams.out, "Updated Account CR {}", ops.account_name)?;
    Ok(())
}
