//! Integration tests for the authoring tools
//!
//! Walks a complete editing session across the peripheral commands:
//! scaffold a phase, lay out sections, add and edit questions, search,
//! merge a hand-written shard, clean typography, and validate at the end.

use qbank::services::question_service::{self, ImportOptions, NewQuestion};
use qbank::services::search_service::{self, SearchFilters};
use qbank::services::{
    clean_service, merge_service, scaffold_service, section_service, store, validate_service,
};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

fn shard_question(id: &str, section: &str, order: i64) -> Value {
    json!({
        "id": id,
        "section_id": section,
        "order": order,
        "title": "Ritual review",
        "prompt": "How did the weekly ritual go?",
        "type": "free_text",
        "answer_schema": {"text": ""},
        "tags": {"included_in_manifests": ["full"]},
        "examples": ["We kept walks 5 of 7 days"]
    })
}

fn questions_doc(data_dir: &Path, phase: &str) -> Value {
    store::load_json(&store::questions_path(data_dir, phase)).unwrap()
}

#[test]
fn test_authoring_session() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path();

    // Fresh phase from built-in templates.
    scaffold_service::scaffold(data, "phase_1", Some("Foundations"), None, None, false).unwrap();
    section_service::add(data, "phase_1", "s1", "Connection", None).unwrap();
    section_service::add(data, "phase_1", "s2", "Growth", None).unwrap();

    // Author two questions through the CLI services.
    let message = question_service::add(
        data,
        "phase_1",
        &NewQuestion {
            section: "s1",
            question_type: "free_text",
            title: "What moments stood out?",
            prompt: "Describe one or two moments.",
            options: None,
            manifests: Some("lite,full"),
            examples: Some("Cooking together on Sunday"),
        },
    )
    .unwrap();
    assert_eq!(
        message,
        "[SUCCESS] Added q01 to phase_1/s1 (manifests: lite, full)"
    );

    question_service::add(
        data,
        "phase_1",
        &NewQuestion {
            section: "s1",
            question_type: "single_select",
            title: "Overall mood?",
            prompt: "Pick the closest answer.",
            options: Some("great:Great,rough:Rough"),
            manifests: None,
            examples: Some("Mostly great"),
        },
    )
    .unwrap();

    // Membership filters see the refreshed manifests immediately.
    let lite_only = search_service::search(
        data,
        None,
        &SearchFilters {
            manifest: Some("lite"),
            ..SearchFilters::default()
        },
        "ids",
        None,
    )
    .unwrap();
    assert_eq!(lite_only, "q01");

    let not_lite = search_service::search(
        data,
        None,
        &SearchFilters {
            manifest: Some("lite"),
            exclude: true,
            ..SearchFilters::default()
        },
        "ids",
        None,
    )
    .unwrap();
    assert_eq!(not_lite, "q02");

    // Edits show up in the summary view.
    question_service::update(data, "phase_1", "q01", "title", "Standout moments").unwrap();
    let summary = question_service::get(data, "phase_1", "q01", false).unwrap();
    assert!(summary.starts_with("[q01] Standout moments"));
    assert!(summary.contains("Manifests: lite, full"));

    // A hand-written shard lands in the document via merge.
    let shards_dir = store::phase_dir(data, "phase_1").join(store::SHARDS_DIR);
    store::write_json(&shards_dir.join("q03.json"), &shard_question("q03", "s2", 3)).unwrap();
    let message = merge_service::merge(data, "phase_1").unwrap();
    assert_eq!(
        message,
        "[SUCCESS] Merged 1 questions into phase_1/questions.json"
    );
    let doc = questions_doc(data, "phase_1");
    assert!(doc["manifests"]["full"]["question_ids"]
        .as_array()
        .unwrap()
        .contains(&json!("q03")));

    // Merge refreshes manifests but leaves section membership to the author.
    let outcome =
        validate_service::validate_schema(data, Some("phase_1"), None, false, "text", None)
            .unwrap();
    assert!(!outcome.failed);
    assert!(outcome
        .output
        .contains("Orphan questions (not in any section): q03"));

    question_service::update(data, "phase_1", "q03", "section_id", "s2").unwrap();
    let outcome =
        validate_service::validate_schema(data, Some("phase_1"), None, false, "text", None)
            .unwrap();
    assert!(outcome.output.contains("[PASS] phase_1: PASS"));

    // Typography cleanup over the whole phase.
    question_service::update(data, "phase_1", "q02", "title", "\u{201C}Bold\u{201D} choices")
        .unwrap();
    let message = clean_service::clean(data, Some("phase_1")).unwrap();
    assert!(message.ends_with("Finished. Processed 4 files."));
    let doc = questions_doc(data, "phase_1");
    assert_eq!(doc["questions"]["q02"]["title"], "Bold choices");

    // Deleting scrubs sections and manifests in one step.
    let message = question_service::delete(data, "phase_1", "q02").unwrap();
    assert_eq!(message, "[SUCCESS] Deleted q02 from phase_1");
    let doc = questions_doc(data, "phase_1");
    assert!(doc["questions"].get("q02").is_none());
    assert!(!doc["manifests"]["full"]["question_ids"]
        .as_array()
        .unwrap()
        .contains(&json!("q02")));

    // Sections refuse to disappear while they still hold questions.
    let err = section_service::remove(data, "phase_1", "s2")
        .unwrap_err()
        .to_string();
    assert_eq!(
        err,
        "Section s2 contains 1 question(s). Remove or move questions first."
    );
    question_service::update(data, "phase_1", "q03", "section_id", "s1").unwrap();
    section_service::remove(data, "phase_1", "s2").unwrap();

    let listing = section_service::list(data, "phase_1", false).unwrap();
    assert!(listing.contains("1. [s1] Connection"));
    assert!(listing.contains("   IDs: q01, q03"));
    assert!(listing.ends_with("Total sections: 1"));

    // Still healthy after the whole session.
    let outcome =
        validate_service::validate_schema(data, Some("phase_1"), None, true, "text", None)
            .unwrap();
    assert!(!outcome.failed, "report: {}", outcome.output);
}

#[test]
fn test_import_fills_missing_id_and_order() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path();
    scaffold_service::scaffold(data, "phase_1", None, None, None, false).unwrap();
    section_service::add(data, "phase_1", "s1", "Connection", None).unwrap();

    let incoming = temp_dir.path().join("incoming.json");
    store::write_json(
        &incoming,
        &json!({
            "section_id": "s1",
            "title": "Imported question",
            "prompt": "P",
            "type": "free_text",
            "answer_schema": {"text": ""},
            "examples": ["sample"]
        }),
    )
    .unwrap();

    let message = question_service::import(
        data,
        "phase_1",
        &incoming,
        &ImportOptions {
            section: None,
            manifests: Some("lite"),
            overwrite: false,
        },
    )
    .unwrap();
    assert_eq!(message, "[SUCCESS] Imported q01 into phase_1/s1");

    let doc = questions_doc(data, "phase_1");
    assert_eq!(doc["questions"]["q01"]["order"], 1);
    assert_eq!(
        doc["questions"]["q01"]["tags"]["included_in_manifests"],
        json!(["lite"])
    );
    assert_eq!(doc["manifests"]["lite"]["question_ids"], json!(["q01"]));
    assert_eq!(doc["sections"][0]["question_ids"], json!(["q01"]));
}

#[test]
fn test_search_spans_phases() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path();
    for (phase, title) in [("phase_1", "Gratitude moment"), ("phase_2", "Gratitude list")] {
        scaffold_service::scaffold(data, phase, None, None, None, false).unwrap();
        section_service::add(data, phase, "s1", "Connection", None).unwrap();
        question_service::add(
            data,
            phase,
            &NewQuestion {
                section: "s1",
                question_type: "free_text",
                title,
                prompt: "Answer honestly.",
                options: None,
                manifests: Some("full"),
                examples: Some("sample"),
            },
        )
        .unwrap();
    }

    let all = search_service::search(
        data,
        None,
        &SearchFilters {
            text: Some("gratitude"),
            ..SearchFilters::default()
        },
        "text",
        None,
    )
    .unwrap();
    assert!(all.starts_with("Found 2 questions:"));
    assert!(all.contains("  Phase: phase_1, Section: s1, Manifests: full"));
    assert!(all.contains("  Phase: phase_2, Section: s1, Manifests: full"));

    let scoped = search_service::search(
        data,
        Some("phase_2"),
        &SearchFilters {
            text: Some("gratitude"),
            ..SearchFilters::default()
        },
        "count",
        None,
    )
    .unwrap();
    assert_eq!(scoped, "Found 1 questions");
}
