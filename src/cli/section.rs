//! Section CLI commands

use clap::Subcommand;
use dialoguer::Confirm;
use std::path::PathBuf;

use crate::services::section_service;
use crate::Result;

#[derive(Subcommand)]
pub enum SectionCommands {
    /// Add a new section to a phase
    Add {
        /// Phase directory name (e.g., phase_1)
        phase: String,

        /// Section ID (must start with 's', e.g., s3)
        id: String,

        /// Section title
        title: String,

        /// 1-based position in the section list (appends when omitted)
        #[arg(short, long)]
        order: Option<usize>,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Remove an empty section
    Remove {
        /// Phase directory name
        phase: String,

        /// Section ID to remove
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        confirm: bool,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Rename a section
    Rename {
        /// Phase directory name
        phase: String,

        /// Section ID to rename
        id: String,

        /// New title
        title: String,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Move a section to a new position
    Reorder {
        /// Phase directory name
        phase: String,

        /// Section ID to move
        id: String,

        /// 1-based target position
        position: usize,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// List a phase's sections
    List {
        /// Phase directory name
        phase: String,

        /// Print the raw JSON instead of the summary
        #[arg(long)]
        json: bool,

        /// Content data directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

pub fn run(cmd: SectionCommands) -> Result<()> {
    match cmd {
        SectionCommands::Add {
            phase,
            id,
            title,
            order,
            data_dir,
        } => {
            let result = section_service::add(&data_dir, &phase, &id, &title, order)?;
            println!("{}", result);
        }

        SectionCommands::Remove {
            phase,
            id,
            confirm,
            data_dir,
        } => {
            if !confirm {
                let proceed = Confirm::new()
                    .with_prompt(format!("Remove section {} from {}?", id, phase))
                    .default(false)
                    .interact()?;
                if !proceed {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            let result = section_service::remove(&data_dir, &phase, &id)?;
            println!("{}", result);
        }

        SectionCommands::Rename {
            phase,
            id,
            title,
            data_dir,
        } => {
            let result = section_service::rename(&data_dir, &phase, &id, &title)?;
            println!("{}", result);
        }

        SectionCommands::Reorder {
            phase,
            id,
            position,
            data_dir,
        } => {
            let result = section_service::reorder(&data_dir, &phase, &id, position)?;
            println!("{}", result);
        }

        SectionCommands::List {
            phase,
            json,
            data_dir,
        } => {
            let result = section_service::list(&data_dir, &phase, json)?;
            println!("{}", result);
        }
    }
    Ok(())
}
