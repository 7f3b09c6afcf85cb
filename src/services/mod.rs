//! Service layer for qbank
//!
//! Business logic shared by the CLI commands. Each service is a set of free
//! functions that return the message to print, so commands stay thin.

pub mod clean_service;
pub mod convert_service;
pub mod merge_service;
pub mod question_service;
pub mod scaffold_service;
pub mod search_service;
pub mod section_service;
pub mod store;
pub mod validate_service;

// Re-export commonly used types
pub use convert_service::convert;
pub use merge_service::{merge, refresh_memberships};
pub use question_service::{ImportOptions, NewQuestion};
pub use search_service::{SearchFilters, SearchRow};
pub use validate_service::{validate_prompts, validate_schema, ValidationOutcome};
