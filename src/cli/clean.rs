//! Clean CLI command

use clap::Args;
use std::path::PathBuf;

use crate::services::clean_service;
use crate::Result;

#[derive(Args)]
pub struct CleanArgs {
    /// Clean a single phase (defaults to every JSON file under the data dir)
    #[arg(short, long)]
    pub phase: Option<String>,

    /// Content data directory
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

pub fn run(args: CleanArgs) -> Result<()> {
    let result = clean_service::clean(&args.data_dir, args.phase.as_deref())?;
    println!("{}", result);
    Ok(())
}
