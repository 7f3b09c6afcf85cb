//! Search CLI command

use clap::Args;
use std::path::PathBuf;

use crate::services::search_service::{self, SearchFilters};
use crate::Result;

#[derive(Args)]
pub struct SearchArgs {
    /// Case-insensitive text to find in titles, prompts and option labels
    #[arg(short, long)]
    pub text: Option<String>,

    /// Filter by question type (free_text, single_select, multi_select, compound)
    #[arg(long = "type")]
    pub question_type: Option<String>,

    /// Filter by section ID
    #[arg(short, long)]
    pub section: Option<String>,

    /// Filter by manifest membership (e.g., lite or full)
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Invert the manifest filter to questions NOT in the manifest
    #[arg(long, requires = "manifest")]
    pub exclude: bool,

    /// Only questions missing a key (examples, validation, options)
    #[arg(long)]
    pub missing: Option<String>,

    /// Search a single phase (defaults to every phase under the data dir)
    #[arg(short, long)]
    pub phase: Option<String>,

    /// Output format (text, json, count, ids)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Write the results to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content data directory
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

pub fn run(args: SearchArgs) -> Result<()> {
    let filters = SearchFilters {
        text: args.text.as_deref(),
        question_type: args.question_type.as_deref(),
        section: args.section.as_deref(),
        manifest: args.manifest.as_deref(),
        exclude: args.exclude,
        missing: args.missing.as_deref(),
    };
    let result = search_service::search(
        &args.data_dir,
        args.phase.as_deref(),
        &filters,
        &args.format,
        args.output.as_deref(),
    )?;
    println!("{}", result);
    Ok(())
}
