//! Scaffold CLI command

use clap::Args;
use std::path::PathBuf;

use crate::services::scaffold_service;
use crate::Result;

#[derive(Args)]
pub struct ScaffoldArgs {
    /// Phase directory name to create (e.g., phase_3)
    pub phase: String,

    /// Phase title written into manifest.json and questions.json
    #[arg(short, long)]
    pub title: Option<String>,

    /// Phase subtitle shown under the title
    #[arg(long)]
    pub subtitle: Option<String>,

    /// Existing phase to copy structure from instead of the built-in templates
    #[arg(long)]
    pub template: Option<String>,

    /// Show what would be created without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Content data directory
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

pub fn run(args: ScaffoldArgs) -> Result<()> {
    let result = scaffold_service::scaffold(
        &args.data_dir,
        &args.phase,
        args.title.as_deref(),
        args.subtitle.as_deref(),
        args.template.as_deref(),
        args.dry_run,
    )?;
    println!("{}", result);
    Ok(())
}
