use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use qbank::Result;
use std::io;

#[derive(Parser)]
#[command(name = "qbank")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Question bank authoring toolkit", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a question bank text file into questions.json
    Convert(qbank::cli::convert::ConvertArgs),

    /// Merge per-question shards back into a phase's questions.json
    Merge(qbank::cli::merge::MergeArgs),

    /// Validate questions.json files against the content schema
    Validate(qbank::cli::validate::ValidateArgs),

    /// Validate prompts.json files
    #[command(name = "validate-prompts")]
    ValidatePrompts(qbank::cli::validate::PromptsArgs),

    /// Question operations
    #[command(subcommand)]
    Question(qbank::cli::question::QuestionCommands),

    /// Section operations
    #[command(subcommand)]
    Section(qbank::cli::section::SectionCommands),

    /// Search questions across phases
    Search(qbank::cli::search::SearchArgs),

    /// Create the directory skeleton for a new phase
    Scaffold(qbank::cli::scaffold::ScaffoldArgs),

    /// Normalize typographic characters in phase JSON files
    Clean(qbank::cli::clean::CleanArgs),

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert(args) => qbank::cli::convert::run(args)?,

        Commands::Merge(args) => qbank::cli::merge::run(args)?,

        Commands::Validate(args) => qbank::cli::validate::run(args)?,

        Commands::ValidatePrompts(args) => qbank::cli::validate::run_prompts(args)?,

        Commands::Question(cmd) => qbank::cli::question::run(cmd)?,

        Commands::Section(cmd) => qbank::cli::section::run(cmd)?,

        Commands::Search(args) => qbank::cli::search::run(args)?,

        Commands::Scaffold(args) => qbank::cli::scaffold::run(args)?,

        Commands::Clean(args) => qbank::cli::clean::run(args)?,

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "qbank", &mut io::stdout());
        }
    }

    Ok(())
}
