use super::{Manifest, Question, Section};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The persisted questions.json form: sections, a question map keyed by id,
/// derived manifests, and display hints passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDocument {
    pub sections: Vec<Section>,

    pub questions: BTreeMap<String, Question>,

    /// Display metadata for the front end; assembled during aggregation and
    /// otherwise not semantically processed
    pub ui_hints: serde_json::Value,

    pub manifests: BTreeMap<String, Manifest>,

    pub primary_manifest_id: String,
}

impl QuestionDocument {
    /// Look up a section by id
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}
