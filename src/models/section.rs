use serde::{Deserialize, Serialize};

/// An ordered group of questions under one heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Short stable identifier, unique within a document (e.g., "s1")
    pub id: String,

    /// Human-readable heading with any trailing parenthetical stripped
    pub title: String,

    /// Question ids belonging to this section, in document order
    pub question_ids: Vec<String>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            question_ids: Vec::new(),
        }
    }
}
