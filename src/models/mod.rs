pub mod document;
pub mod manifest;
pub mod question;
pub mod report;
pub mod section;

pub use document::QuestionDocument;
pub use manifest::Manifest;
pub use question::{
    AnswerOption, AnswerSlot, Field, FieldType, Question, QuestionType, ShowWhen, Tags,
};
pub use report::{DocStatus, PhaseReport};
pub use section::Section;
