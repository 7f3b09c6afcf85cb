//! Structural checks for AI prompt definition files.
//!
//! Each phase ships a `prompts.json` with one prompt per reflection flow;
//! the checks here keep those definitions complete enough for the
//! downstream reflection features to render them.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::models::PhaseReport;

/// Every phase must define all four reflection prompts.
pub const REQUIRED_PROMPTS: [&str; 4] = [
    "individual_reflection_lite",
    "individual_reflection_full",
    "couple_reflection_lite",
    "couple_reflection_full",
];

const STRING_FIELDS: [&str; 4] = ["id", "title", "description", "role"];
const LIST_FIELDS: [&str; 4] = ["inputs", "context", "output_format", "constraints"];
const INPUT_ENTRY_FIELDS: [&str; 3] = ["key", "label", "placeholder"];
const PLACEHOLDER_PATTERNS: [&str; 4] = ["REPLACE:", "REPLACE_", "TODO:", "FIXME:"];

pub struct PromptsValidator {
    strict: bool,
}

impl PromptsValidator {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn validate_file(&self, phase: &str, path: &Path) -> PhaseReport {
        if !path.exists() {
            return self.failed(phase, "File does not exist".to_string());
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => return self.failed(phase, format!("Cannot read file: {}", e)),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(doc) => self.validate_value(phase, &doc),
            Err(e) => self.failed(phase, format!("Invalid JSON: {}", e)),
        }
    }

    pub fn validate_value(&self, phase: &str, doc: &Value) -> PhaseReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let Some(prompts) = doc.get("prompts").and_then(Value::as_object) else {
            return self.failed(phase, "Missing root \"prompts\" object".to_string());
        };
        for name in REQUIRED_PROMPTS {
            if !prompts.contains_key(name) {
                errors.push(format!("Missing required prompt \"{}\"", name));
            }
        }
        for (name, prompt) in prompts {
            check_prompt(name, prompt, &mut errors, &mut warnings);
        }

        if self.strict {
            errors.append(&mut warnings);
        }
        PhaseReport::from_findings(phase, errors, warnings, Vec::new())
    }

    fn failed(&self, phase: &str, message: String) -> PhaseReport {
        PhaseReport::from_findings(phase, vec![message], Vec::new(), Vec::new())
    }
}

fn check_prompt(name: &str, prompt: &Value, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let Some(obj) = prompt.as_object() else {
        errors.push(format!(
            "{}: expected object, got {}",
            name,
            json_type_name(prompt)
        ));
        return;
    };

    for field in STRING_FIELDS {
        match obj.get(field) {
            None => errors.push(format!("{}: missing required field \"{}\"", name, field)),
            Some(value) if !value.is_string() => errors.push(format!(
                "{}.{}: expected string, got {}",
                name,
                field,
                json_type_name(value)
            )),
            _ => {}
        }
    }
    for field in LIST_FIELDS {
        match obj.get(field) {
            None => errors.push(format!("{}: missing required field \"{}\"", name, field)),
            Some(value) if !value.is_array() => errors.push(format!(
                "{}.{}: expected array, got {}",
                name,
                field,
                json_type_name(value)
            )),
            _ => {}
        }
    }

    if let Some(inputs) = obj.get("inputs").and_then(Value::as_array) {
        for (i, input) in inputs.iter().enumerate() {
            for field in INPUT_ENTRY_FIELDS {
                if input.get(field).and_then(Value::as_str).is_none() {
                    errors.push(format!("{}.inputs[{}]: missing \"{}\"", name, i, field));
                }
            }
        }
    }
    if let Some(items) = obj.get("output_format").and_then(Value::as_array) {
        for (i, item) in items.iter().enumerate() {
            if item.get("section").and_then(Value::as_str).is_none() {
                errors.push(format!("{}.output_format[{}]: missing \"section\"", name, i));
            }
            if item.get("requirements").and_then(Value::as_array).is_none() {
                errors.push(format!(
                    "{}.output_format[{}]: missing \"requirements\"",
                    name, i
                ));
            }
        }
    }

    for field in ["context", "constraints"] {
        if let Some(items) = obj.get(field).and_then(Value::as_array) {
            if items.is_empty() {
                warnings.push(format!(
                    "{}.{}: empty array, consider adding {}",
                    name, field, field
                ));
            }
        }
    }
    for field in ["title", "description", "role"] {
        if let Some(text) = obj.get(field).and_then(Value::as_str) {
            if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| text.contains(*p)) {
                warnings.push(format!(
                    "{}.{}: contains placeholder text '{}'",
                    name, field, pattern
                ));
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocStatus;
    use serde_json::json;

    fn prompt_named(id: &str) -> Value {
        json!({
            "id": id,
            "title": "Individual Reflection",
            "description": "Guides a short personal reflection on the answers.",
            "role": "You are a warm, neutral facilitator.",
            "inputs": [
                {"key": "respondent_display_name", "label": "Name", "placeholder": "Alex"},
                {"key": "responses", "label": "Responses", "placeholder": "{...}"}
            ],
            "context": ["Answers are private to the respondent."],
            "output_format": [
                {"section": "Summary", "requirements": ["At most two sentences"]}
            ],
            "constraints": ["No medical advice"]
        })
    }

    fn valid_prompts() -> Value {
        let mut prompts = serde_json::Map::new();
        for name in REQUIRED_PROMPTS {
            prompts.insert(name.to_string(), prompt_named(name));
        }
        json!({ "prompts": prompts })
    }

    fn validate(doc: &Value) -> PhaseReport {
        PromptsValidator::new(false).validate_value("phase_2", doc)
    }

    #[test]
    fn test_complete_prompts_pass() {
        let report = validate(&valid_prompts());
        assert_eq!(report.status, DocStatus::Pass);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_required_prompt() {
        let mut doc = valid_prompts();
        doc["prompts"]
            .as_object_mut()
            .unwrap()
            .remove("couple_reflection_full");
        let report = validate(&doc);
        assert_eq!(report.status, DocStatus::Fail);
        assert!(report
            .errors
            .contains(&"Missing required prompt \"couple_reflection_full\"".to_string()));
    }

    #[test]
    fn test_missing_root_object() {
        let report = validate(&json!({"individual_reflection_lite": {}}));
        assert_eq!(report.status, DocStatus::Fail);
        assert_eq!(report.errors, ["Missing root \"prompts\" object"]);
    }

    #[test]
    fn test_wrong_field_type() {
        let mut doc = valid_prompts();
        doc["prompts"]["individual_reflection_lite"]["constraints"] = json!("be nice");
        let report = validate(&doc);
        assert!(report.errors.contains(
            &"individual_reflection_lite.constraints: expected array, got string".to_string()
        ));
    }

    #[test]
    fn test_input_entry_requires_key_label_placeholder() {
        let mut doc = valid_prompts();
        doc["prompts"]["individual_reflection_lite"]["inputs"] = json!([{"key": "responses"}]);
        let report = validate(&doc);
        assert!(report
            .errors
            .contains(&"individual_reflection_lite.inputs[0]: missing \"label\"".to_string()));
        assert!(report.errors.contains(
            &"individual_reflection_lite.inputs[0]: missing \"placeholder\"".to_string()
        ));
    }

    #[test]
    fn test_empty_constraints_warn() {
        let mut doc = valid_prompts();
        doc["prompts"]["couple_reflection_lite"]["constraints"] = json!([]);
        let report = validate(&doc);
        assert_eq!(report.status, DocStatus::Warn);
        assert!(report.warnings.contains(
            &"couple_reflection_lite.constraints: empty array, consider adding constraints"
                .to_string()
        ));
    }

    #[test]
    fn test_placeholder_text_warns() {
        let mut doc = valid_prompts();
        doc["prompts"]["couple_reflection_full"]["description"] =
            json!("REPLACE: describe this prompt");
        let report = validate(&doc);
        assert!(report.warnings.contains(
            &"couple_reflection_full.description: contains placeholder text 'REPLACE:'".to_string()
        ));
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let mut doc = valid_prompts();
        doc["prompts"]["couple_reflection_lite"]["context"] = json!([]);
        let report = PromptsValidator::new(true).validate_value("phase_2", &doc);
        assert_eq!(report.status, DocStatus::Fail);
    }
}
