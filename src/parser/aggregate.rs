//! Assembly of parsed sections and questions into a question document:
//! section membership, manifest membership, and UI hints.

use std::collections::BTreeMap;

use serde_json::json;

use crate::config::AuthoringConfig;
use crate::models::{Manifest, Question, QuestionDocument, Section};

/// Builds the complete document from parser output. Returns the document
/// and aggregation warnings (questions pointing at unknown sections).
pub fn build_document(
    sections: Vec<Section>,
    questions: Vec<Question>,
    config: &AuthoringConfig,
) -> (QuestionDocument, Vec<String>) {
    let mut sections = sections;
    let mut warnings = Vec::new();

    for question in &questions {
        match sections.iter_mut().find(|s| s.id == question.section_id) {
            Some(section) => section.question_ids.push(question.id.clone()),
            None => warnings.push(format!(
                "Question {} has unknown section {}",
                question.id, question.section_id
            )),
        }
    }

    let manifests = build_manifests(&questions, config);
    let ui_hints = build_ui_hints(&manifests, config);
    let question_map: BTreeMap<String, Question> =
        questions.into_iter().map(|q| (q.id.clone(), q)).collect();

    let document = QuestionDocument {
        sections,
        questions: question_map,
        ui_hints,
        manifests,
        primary_manifest_id: config.primary_manifest.clone(),
    };
    (document, warnings)
}

/// Membership comes from each question's manifest tags; within a manifest,
/// questions run in (order, id) sequence.
fn build_manifests(
    questions: &[Question],
    config: &AuthoringConfig,
) -> BTreeMap<String, Manifest> {
    config
        .manifests
        .iter()
        .map(|(name, meta)| {
            let mut members: Vec<&Question> = questions
                .iter()
                .filter(|q| q.manifest_names().iter().any(|m| m == name))
                .collect();
            members.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
            let manifest = Manifest {
                id: name.clone(),
                title: meta.title.clone(),
                question_ids: members.iter().map(|q| q.id.clone()).collect(),
                timebox_minutes: meta.timebox_minutes,
                post_timebox_activity: meta.post_timebox_activity.clone(),
            };
            (name.clone(), manifest)
        })
        .collect()
}

/// The front end reads a mode switcher out of `ui_hints`; each manifest
/// becomes one switch position labelled with its question count.
fn build_ui_hints(
    manifests: &BTreeMap<String, Manifest>,
    config: &AuthoringConfig,
) -> serde_json::Value {
    let mut names: Vec<&String> = manifests.keys().collect();
    names.sort_by_key(|name| manifest_display_order(name));

    let options: Vec<serde_json::Value> = names
        .iter()
        .map(|name| {
            let count = manifests[name.as_str()].question_ids.len();
            json!({
                "id": name,
                "label": format!("{} ({})", capitalize(name), count),
            })
        })
        .collect();

    json!({
        "controls": {
            "mode_switcher": {
                "default": config.primary_manifest,
                "options": options,
            }
        }
    })
}

/// Lite always renders before full; anything else trails alphabetically.
pub fn manifest_display_order(name: &str) -> (u8, String) {
    let rank = match name {
        crate::config::LITE => 0,
        crate::config::FULL => 1,
        _ => 2,
    };
    (rank, name.to_string())
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::question_bank::BankParser;

    fn document_for(text: &str) -> (QuestionDocument, Vec<String>) {
        let config = AuthoringConfig::default();
        let bank = BankParser::new().unwrap().parse(text, &config);
        build_document(bank.sections, bank.questions, &config)
    }

    #[test]
    fn test_sections_collect_their_questions() {
        let (doc, warnings) = document_for(
            "SECTION s1 — One\n\
             q01 — A (free_text)\n\
             q02 — B (free_text)\n\
             SECTION s2 — Two\n\
             q03 — C (free_text)\n",
        );
        assert!(warnings.is_empty());
        assert_eq!(doc.sections[0].question_ids, ["q01", "q02"]);
        assert_eq!(doc.sections[1].question_ids, ["q03"]);
        assert_eq!(doc.questions.len(), 3);
    }

    #[test]
    fn test_unknown_section_warns() {
        let (doc, warnings) = document_for(
            "SECTION s1 — One\n\
             q01 — A (free_text)\n\
             SECTION s7\n\
             q02 — B (free_text)\n",
        );
        assert_eq!(warnings, ["Question q02 has unknown section s7"]);
        assert_eq!(doc.sections[0].question_ids, ["q01"]);
    }

    #[test]
    fn test_manifest_membership_and_ordering() {
        // q04 is full-only under the default config; q01/q02 are lite.
        let (doc, _) = document_for(
            "SECTION s1 — One\n\
             q04 — D (free_text)\n\
             q02 — B (free_text)\n\
             q01 — A (free_text)\n",
        );
        assert_eq!(doc.manifests["lite"].question_ids, ["q01", "q02"]);
        assert_eq!(doc.manifests["full"].question_ids, ["q01", "q02", "q04"]);
        assert_eq!(doc.manifests["full"].timebox_minutes, 60);
        assert_eq!(doc.primary_manifest_id, "lite");
    }

    #[test]
    fn test_mode_switcher_hints() {
        let (doc, _) = document_for(
            "SECTION s1 — One\n\
             q01 — A (free_text)\n\
             q04 — D (free_text)\n",
        );
        let switcher = &doc.ui_hints["controls"]["mode_switcher"];
        assert_eq!(switcher["default"], "lite");
        assert_eq!(switcher["options"][0]["id"], "lite");
        assert_eq!(switcher["options"][0]["label"], "Lite (1)");
        assert_eq!(switcher["options"][1]["label"], "Full (2)");
    }
}
