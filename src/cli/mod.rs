//! CLI command modules
//!
//! Each command parses its own arguments and delegates to the service layer,
//! printing whatever message the service returns.

pub mod clean;
pub mod convert;
pub mod merge;
pub mod question;
pub mod scaffold;
pub mod search;
pub mod section;
pub mod validate;
