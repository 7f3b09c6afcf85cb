//! Merge CLI command

use clap::Args;
use std::path::PathBuf;

use crate::services::merge_service;
use crate::Result;

#[derive(Args)]
pub struct MergeArgs {
    /// Phase directory name (e.g., phase_1)
    pub phase: String,

    /// Content data directory
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

pub fn run(args: MergeArgs) -> Result<()> {
    let result = merge_service::merge(&args.data_dir, &args.phase)?;
    println!("{}", result);
    Ok(())
}
