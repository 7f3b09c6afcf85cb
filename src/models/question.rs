use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed vocabulary of question types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    FreeText,
    SingleSelect,
    MultiSelect,
    RankedSelect,
    Compound,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::FreeText,
        QuestionType::SingleSelect,
        QuestionType::MultiSelect,
        QuestionType::RankedSelect,
        QuestionType::Compound,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QuestionType::FreeText => "free_text",
            QuestionType::SingleSelect => "single_select",
            QuestionType::MultiSelect => "multi_select",
            QuestionType::RankedSelect => "ranked_select",
            QuestionType::Compound => "compound",
        }
    }

    /// Exact-name lookup against the closed vocabulary
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// The whole vocabulary as a display list for error messages
    pub fn vocabulary() -> String {
        Self::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Types a compound sub-field may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    ShortText,
    FreeText,
    Number,
    SingleSelect,
    MultiSelect,
    RankedSelect,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::ShortText => "short_text",
            FieldType::FreeText => "free_text",
            FieldType::Number => "number",
            FieldType::SingleSelect => "single_select",
            FieldType::MultiSelect => "multi_select",
            FieldType::RankedSelect => "ranked_select",
        }
    }

    /// List-valued fields store their answer as a sequence, everything else
    /// as a single string
    pub fn is_list_valued(&self) -> bool {
        matches!(self, FieldType::MultiSelect | FieldType::RankedSelect)
    }
}

/// One selectable choice on a select-type question or field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Normalized slug derived from the label
    pub value: String,

    /// Human-readable label as authored
    pub label: String,
}

impl AnswerOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A named sub-answer slot inside a compound question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Slug derived from the label, unique among sibling fields
    pub key: String,

    /// Human-readable sub-prompt
    pub label: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Present only for select-like field types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AnswerOption>>,
}

/// Empty-value shape a stored answer must have: a string slot or a list slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerSlot {
    Text(String),
    List(Vec<String>),
}

impl AnswerSlot {
    pub fn empty_text() -> Self {
        AnswerSlot::Text(String::new())
    }

    pub fn empty_list() -> Self {
        AnswerSlot::List(Vec::new())
    }
}

/// Conditional-visibility rule: show only when a referenced question's
/// selected value is a member of the literal set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowWhen {
    pub field: String,

    #[serde(rename = "in")]
    pub values: Vec<String>,
}

/// Editorial tags attached to a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    /// Manifest names ("lite", "full") this question belongs to
    pub included_in_manifests: Vec<String>,
}

/// One prompt unit with a typed answer shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// "q" + zero-padded integer, unique across the whole document
    pub id: String,

    /// Back-reference to the owning section
    pub section_id: String,

    /// Numeric ordering key derived from the id suffix
    pub order: u32,

    /// Short label from the question header, type annotation removed
    pub title: String,

    /// Free-text instruction shown to the respondent
    pub prompt: String,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// Shape of the stored answer, fully determined by the question type
    /// (and, for compound, by the fields)
    pub answer_schema: BTreeMap<String, AnswerSlot>,

    pub tags: Tags,

    /// Present only for select-type questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AnswerOption>>,

    /// Present only for compound questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,

    #[serde(rename = "showWhen", skip_serializing_if = "Option::is_none")]
    pub show_when: Option<ShowWhen>,

    /// Illustrative answer strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

impl Question {
    /// Manifest membership recorded on the question itself
    pub fn manifest_names(&self) -> &[String] {
        &self.tags.included_in_manifests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_round_trip() {
        for t in QuestionType::ALL {
            assert_eq!(QuestionType::from_name(t.name()), Some(t));
        }
        assert_eq!(QuestionType::from_name("likert"), None);
    }

    #[test]
    fn test_answer_slot_serialization() {
        let text = serde_json::to_string(&AnswerSlot::empty_text()).unwrap();
        assert_eq!(text, "\"\"");

        let list = serde_json::to_string(&AnswerSlot::empty_list()).unwrap();
        assert_eq!(list, "[]");
    }

    #[test]
    fn test_show_when_uses_in_key() {
        let rule = ShowWhen {
            field: "q29".to_string(),
            values: vec!["yes".to_string(), "unsure".to_string()],
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["in"], serde_json::json!(["yes", "unsure"]));
        assert_eq!(json["field"], "q29");
    }

    #[test]
    fn test_optional_blocks_omitted() {
        let q = Question {
            id: "q01".to_string(),
            section_id: "s1".to_string(),
            order: 1,
            title: "Warm-up".to_string(),
            prompt: "How are you arriving today?".to_string(),
            question_type: QuestionType::FreeText,
            answer_schema: BTreeMap::from([("text".to_string(), AnswerSlot::empty_text())]),
            tags: Tags {
                included_in_manifests: vec!["full".to_string()],
            },
            options: None,
            fields: None,
            show_when: None,
            examples: None,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert!(json.get("options").is_none());
        assert!(json.get("fields").is_none());
        assert!(json.get("showWhen").is_none());
        assert_eq!(json["type"], "free_text");
    }
}
