pub mod format;
pub mod prompts;
pub mod schema;

pub use format::{
    render_report, render_text, ReportFormat, PROMPTS_REPORT_TITLE, SCHEMA_REPORT_TITLE,
};
pub use prompts::{PromptsValidator, REQUIRED_PROMPTS};
pub use schema::{Check, SchemaValidator, UnknownCheck};
