pub mod aggregate;
pub mod line;
pub mod question_bank;
pub mod slug;

pub use aggregate::build_document;
pub use line::{LineClassifier, LineKind};
pub use question_bank::{answer_schema_for, BankParser, ParsedBank};
pub use slug::{clean_key, clean_value, reserve_key};
