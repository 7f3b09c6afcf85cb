//! Convert CLI command

use clap::Args;
use std::path::PathBuf;

use crate::services::convert_service;
use crate::Result;

#[derive(Args)]
pub struct ConvertArgs {
    /// Question bank text file to parse
    pub input: PathBuf,

    /// Directory receiving questions.json and per-question shards
    #[arg(short, long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Authoring config file (defaults to qbank.yaml next to the input)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let result = convert_service::convert(&args.input, &args.out_dir, args.config.as_deref())?;
    println!("{}", result);
    Ok(())
}
