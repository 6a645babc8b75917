//! `fueleu pool` — run the greedy pool allocator over a members file.
//!
//! The members file is a JSON array of `{"ship_id", "cb_before"}` objects,
//! matching the API's pool creation payload.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use fueleu_engine::pooling::{allocate, PoolMember, PoolMemberInput};

/// Arguments for the `pool` subcommand.
#[derive(Args, Debug)]
pub struct PoolArgs {
    /// Path to the members file (JSON array of {ship_id, cb_before}).
    #[arg(long)]
    pub members: PathBuf,

    /// Pretty-print the allocation result.
    #[arg(long)]
    pub pretty: bool,
}

/// Run the `pool` subcommand.
pub fn run_pool(args: &PoolArgs) -> anyhow::Result<u8> {
    let raw = std::fs::read_to_string(&args.members)
        .with_context(|| format!("cannot read members file {}", args.members.display()))?;

    let members: Vec<PoolMemberInput> =
        serde_json::from_str(&raw).context("members file is not a valid member array")?;

    let allocated = allocate(&members).context("pool allocation rejected")?;

    println!("{}", render(&allocated, args.pretty)?);
    Ok(0)
}

fn render(allocated: &[PoolMember], pretty: bool) -> anyhow::Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(allocated)?
    } else {
        serde_json::to_string(allocated)?
    };
    Ok(out)
}
