//! Validation CLI commands

use clap::Args;
use std::path::PathBuf;

use crate::services::validate_service;
use crate::Result;

#[derive(Args)]
pub struct ValidateArgs {
    /// Validate a single phase (defaults to every phase under the data dir)
    #[arg(short, long)]
    pub phase: Option<String>,

    /// Comma-separated subset of checks to run
    #[arg(long = "check")]
    pub checks: Option<String>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Report format (text or json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content data directory
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

#[derive(Args)]
pub struct PromptsArgs {
    /// Validate a single phase (defaults to every phase under the data dir)
    #[arg(short, long)]
    pub phase: Option<String>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Report format (text or json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content data directory
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let outcome = validate_service::validate_schema(
        &args.data_dir,
        args.phase.as_deref(),
        args.checks.as_deref(),
        args.strict,
        &args.format,
        args.output.as_deref(),
    )?;
    println!("{}", outcome.output);
    if outcome.failed {
        anyhow::bail!("Validation failed");
    }
    Ok(())
}

pub fn run_prompts(args: PromptsArgs) -> Result<()> {
    let outcome = validate_service::validate_prompts(
        &args.data_dir,
        args.phase.as_deref(),
        args.strict,
        &args.format,
        args.output.as_deref(),
    )?;
    println!("{}", outcome.output);
    if outcome.failed {
        anyhow::bail!("Validation failed");
    }
    Ok(())
}
