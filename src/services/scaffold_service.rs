//! Creates the on-disk skeleton for a new phase.
//!
//! A phase directory carries `manifest.json` (phase metadata), `questions.json`
//! (the full document), `prompts.json` (reflection prompts) and a `questions/`
//! shard directory. New phases start either from the built-in templates or
//! from an existing phase with its content blanked out.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::services::merge_service::refresh_memberships;
use crate::services::store;
use crate::{Context, Result};

const MANIFEST_TEMPLATE: &str = include_str!("../../templates/manifest.json");
const QUESTIONS_TEMPLATE: &str = include_str!("../../templates/questions.json");
const PROMPTS_TEMPLATE: &str = include_str!("../../templates/prompts.json");

pub fn scaffold(
    data_dir: &Path,
    phase: &str,
    title: Option<&str>,
    subtitle: Option<&str>,
    template: Option<&str>,
    dry_run: bool,
) -> Result<String> {
    let dir = store::phase_dir(data_dir, phase);
    if dir.exists() && !dry_run {
        anyhow::bail!("Phase directory already exists: {}", dir.display());
    }

    let (mut manifest, mut questions, prompts) = match template {
        Some(source) => load_from_phase(data_dir, source)?,
        None => builtin_templates()?,
    };

    let title = title.unwrap_or("New Phase");
    manifest["id"] = json!(phase);
    manifest["title"] = json!(title);
    if let Some(subtitle) = subtitle {
        manifest["subtitle"] = json!(subtitle);
    }
    manifest["created"] = json!(chrono::Local::now().format("%Y-%m-%d").to_string());
    if questions.get("artifact").map(Value::is_object).unwrap_or(false) {
        questions["artifact"]["id"] = json!(phase);
        questions["artifact"]["title"] = json!(title);
    }
    questions["sections"] = json!([]);
    questions["questions"] = json!({});
    refresh_memberships(&mut questions);

    if dry_run {
        let dir = dir.display();
        return Ok(format!(
            "[DRY RUN] Would create:\n  {dir}/manifest.json\n  {dir}/questions.json\n  {dir}/prompts.json\n  {dir}/questions/"
        ));
    }

    store::write_json(&dir.join(store::MANIFEST_FILE), &manifest)?;
    store::write_json(&dir.join(store::QUESTIONS_FILE), &questions)?;
    store::write_json(&dir.join(store::PROMPTS_FILE), &prompts)?;
    let shards = dir.join(store::SHARDS_DIR);
    fs::create_dir_all(&shards)
        .with_context(|| format!("Failed to create {}", shards.display()))?;

    Ok(format!(
        "[SUCCESS] Created phase structure: {}\n  - manifest.json\n  - questions.json\n  - prompts.json\n  - questions/ directory",
        phase
    ))
}

/// Copies another phase's files, keeping prompts verbatim; the caller blanks
/// the question content afterwards.
fn load_from_phase(data_dir: &Path, source: &str) -> Result<(Value, Value, Value)> {
    store::require_phase(data_dir, source)?;
    let dir = store::phase_dir(data_dir, source);
    let manifest_path = dir.join(store::MANIFEST_FILE);
    let manifest = if manifest_path.exists() {
        store::load_json(&manifest_path)?
    } else {
        serde_json::from_str(MANIFEST_TEMPLATE)?
    };
    let questions = store::load_json(&store::questions_path(data_dir, source))?;
    let prompts = store::load_json(&store::prompts_path(data_dir, source))?;
    Ok((manifest, questions, prompts))
}

fn builtin_templates() -> Result<(Value, Value, Value)> {
    Ok((
        serde_json::from_str(MANIFEST_TEMPLATE)?,
        serde_json::from_str(QUESTIONS_TEMPLATE)?,
        serde_json::from_str(PROMPTS_TEMPLATE)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocStatus;
    use crate::validator::{PromptsValidator, SchemaValidator};
    use tempfile::TempDir;

    #[test]
    fn test_scaffold_from_builtin_templates() {
        let temp_dir = TempDir::new().unwrap();
        let message = scaffold(
            temp_dir.path(),
            "phase_3",
            Some("Trust"),
            Some("Repair and rebuild"),
            None,
            false,
        )
        .unwrap();
        assert!(message.starts_with("[SUCCESS] Created phase structure: phase_3"));
        assert!(message.contains("questions/ directory"));

        let dir = store::phase_dir(temp_dir.path(), "phase_3");
        assert!(dir.join(store::SHARDS_DIR).is_dir());

        let questions = store::load_json(&store::questions_path(temp_dir.path(), "phase_3")).unwrap();
        assert_eq!(questions["artifact"]["id"], "phase_3");
        assert_eq!(questions["artifact"]["title"], "Trust");
        assert_eq!(questions["manifests"]["lite"]["question_ids"], json!([]));

        let manifest = store::load_json(&dir.join(store::MANIFEST_FILE)).unwrap();
        assert_eq!(manifest["id"], "phase_3");
        assert_eq!(manifest["title"], "Trust");
        assert_eq!(manifest["subtitle"], "Repair and rebuild");
    }

    #[test]
    fn test_scaffolded_phase_validates() {
        let temp_dir = TempDir::new().unwrap();
        scaffold(temp_dir.path(), "phase_3", None, None, None, false).unwrap();

        let schema_report = SchemaValidator::new(false).validate_file(
            "phase_3",
            &store::questions_path(temp_dir.path(), "phase_3"),
        );
        assert_eq!(schema_report.status, DocStatus::Pass);

        // The prompt templates ship REPLACE: markers so authors get nudged,
        // but the structure itself is complete.
        let prompts_report = PromptsValidator::new(false).validate_file(
            "phase_3",
            &store::prompts_path(temp_dir.path(), "phase_3"),
        );
        assert_eq!(prompts_report.status, DocStatus::Warn);
        assert!(prompts_report.errors.is_empty());
    }

    #[test]
    fn test_existing_directory_refused() {
        let temp_dir = TempDir::new().unwrap();
        scaffold(temp_dir.path(), "phase_3", None, None, None, false).unwrap();
        let err = scaffold(temp_dir.path(), "phase_3", None, None, None, false)
            .unwrap_err()
            .to_string();
        assert!(err.starts_with("Phase directory already exists:"));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let message = scaffold(temp_dir.path(), "phase_7", None, None, None, true).unwrap();
        assert!(message.starts_with("[DRY RUN] Would create:"));
        assert!(message.contains("manifest.json"));
        assert!(!store::phase_dir(temp_dir.path(), "phase_7").exists());
    }

    #[test]
    fn test_scaffold_from_existing_phase_blanks_content() {
        let temp_dir = TempDir::new().unwrap();
        scaffold(temp_dir.path(), "phase_1", Some("Origin"), None, None, false).unwrap();

        // Give the source phase some content that must not survive the copy.
        let path = store::questions_path(temp_dir.path(), "phase_1");
        let mut doc = store::load_json(&path).unwrap();
        doc["questions"]["q01"] = json!({
            "id": "q01", "section_id": "s1", "order": 1, "title": "T", "prompt": "P",
            "type": "free_text", "answer_schema": {"text": ""},
            "tags": {"included_in_manifests": ["lite"]}
        });
        doc["sections"] = json!([{"id": "s1", "title": "One", "question_ids": ["q01"]}]);
        refresh_memberships(&mut doc);
        store::write_json(&path, &doc).unwrap();

        scaffold(
            temp_dir.path(),
            "phase_2",
            Some("Copy"),
            None,
            Some("phase_1"),
            false,
        )
        .unwrap();
        let copied = store::load_json(&store::questions_path(temp_dir.path(), "phase_2")).unwrap();
        assert_eq!(copied["sections"], json!([]));
        assert_eq!(copied["questions"], json!({}));
        assert_eq!(copied["manifests"]["lite"]["question_ids"], json!([]));
        assert_eq!(
            copied.pointer("/ui_hints/controls/mode_switcher/options/0/label"),
            Some(&json!("Lite (0)"))
        );

        let prompts = store::load_json(&store::prompts_path(temp_dir.path(), "phase_2")).unwrap();
        assert!(prompts["prompts"]["individual_reflection_lite"].is_object());
    }
}
