// Qbank - Question bank authoring toolkit
// Parses semi-structured check-in question banks and keeps phase content valid

pub mod cli;
pub mod config;
pub mod models;
pub mod parser;
pub mod services;
pub mod validator;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use config::AuthoringConfig;
pub use models::{DocStatus, PhaseReport, Question, QuestionDocument};
pub use parser::{BankParser, ParsedBank};
pub use validator::{PromptsValidator, SchemaValidator};
