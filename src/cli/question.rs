//! Question CLI commands

use clap::Subcommand;
use dialoguer::Confirm;
use std::path::PathBuf;

use crate::services::question_service::{self, ImportOptions, NewQuestion};
use crate::Result;

#[derive(Subcommand)]
pub enum QuestionCommands {
    /// Add a new question to a phase
    Add {
        /// Phase directory name (e.g., phase_1)
        phase: String,

        /// Section that owns the question
        #[arg(short, long)]
        section: String,

        /// Question type (free_text, single_select, multi_select, compound)
        #[arg(short = 't', long = "type")]
        question_type: String,

        /// Question title
        #[arg(long)]
        title: String,

        /// Prompt shown to the respondent
        #[arg(long)]
        prompt: String,

        /// Options as value:label pairs, comma separated
        #[arg(long)]
        options: Option<String>,

        /// Manifests the question belongs to (default: full)
        #[arg(short, long)]
        manifests: Option<String>,

        /// Example answers, comma separated
        #[arg(long)]
        examples: Option<String>,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Update one field of a question
    Update {
        /// Phase directory name
        phase: String,

        /// Question ID (e.g., q05)
        id: String,

        /// Field to update (title, prompt, type, section_id, order, examples)
        field: String,

        /// New value
        value: String,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Delete a question everywhere it is referenced
    Delete {
        /// Phase directory name
        phase: String,

        /// Question ID to delete
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        confirm: bool,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Show a single question
    Get {
        /// Phase directory name
        phase: String,

        /// Question ID to show
        id: String,

        /// Print the raw JSON instead of the summary
        #[arg(long)]
        json: bool,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Import a question from a JSON file
    Import {
        /// Phase directory name
        phase: String,

        /// Question JSON file (absolute, under the phase's questions/, or relative)
        file: PathBuf,

        /// Override the target section
        #[arg(short, long)]
        section: Option<String>,

        /// Override manifest membership, comma separated
        #[arg(short, long)]
        manifests: Option<String>,

        /// Replace an existing question with the same id
        #[arg(long)]
        overwrite: bool,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

pub fn run(cmd: QuestionCommands) -> Result<()> {
    match cmd {
        QuestionCommands::Add {
            phase,
            section,
            question_type,
            title,
            prompt,
            options,
            manifests,
            examples,
            data_dir,
        } => {
            let result = question_service::add(
                &data_dir,
                &phase,
                &NewQuestion {
                    section: &section,
                    question_type: &question_type,
                    title: &title,
                    prompt: &prompt,
                    options: options.as_deref(),
                    manifests: manifests.as_deref(),
                    examples: examples.as_deref(),
                },
            )?;
            println!("{}", result);
        }

        QuestionCommands::Update {
            phase,
            id,
            field,
            value,
            data_dir,
        } => {
            let result = question_service::update(&data_dir, &phase, &id, &field, &value)?;
            println!("{}", result);
        }

        QuestionCommands::Delete {
            phase,
            id,
            confirm,
            data_dir,
        } => {
            if !confirm {
                let proceed = Confirm::new()
                    .with_prompt(format!("Delete {} from {}?", id, phase))
                    .default(false)
                    .interact()?;
                if !proceed {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            let result = question_service::delete(&data_dir, &phase, &id)?;
            println!("{}", result);
        }

        QuestionCommands::Get {
            phase,
            id,
            json,
            data_dir,
        } => {
            let result = question_service::get(&data_dir, &phase, &id, json)?;
            println!("{}", result);
        }

        QuestionCommands::Import {
            phase,
            file,
            section,
            manifests,
            overwrite,
            data_dir,
        } => {
            let result = question_service::import(
                &data_dir,
                &phase,
                &file,
                &ImportOptions {
                    section: section.as_deref(),
                    manifests: manifests.as_deref(),
                    overwrite,
                },
            )?;
            println!("{}", result);
        }
    }
    Ok(())
}
