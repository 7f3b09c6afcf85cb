//! Folding per-question shard files back into a phase's `questions.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::parser::aggregate::capitalize;
use crate::services::store;
use crate::Result;

/// Merges every `questions/q*.json` shard into the phase document, then
/// recomputes manifest membership so edited tags take effect.
pub fn merge(data_dir: &Path, phase: &str) -> Result<String> {
    let phase_dir = store::require_phase(data_dir, phase)?;
    let questions_path = store::questions_path(data_dir, phase);
    if !questions_path.exists() {
        anyhow::bail!("No questions.json in {}", phase);
    }
    let shards_dir = phase_dir.join(store::SHARDS_DIR);
    if !shards_dir.is_dir() {
        anyhow::bail!("No questions/ directory in {}", phase);
    }

    let mut doc = store::load_json(&questions_path)?;
    if !doc.get("questions").map(Value::is_object).unwrap_or(false) {
        anyhow::bail!("No 'questions' object in {}", questions_path.display());
    }

    let pattern = shards_dir.join("q*.json");
    let mut paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .collect::<std::result::Result<_, _>>()?;
    paths.sort();

    let mut merged = 0;
    for path in &paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let shard = store::load_json(path)?;
        doc["questions"][stem] = shard;
        merged += 1;
    }

    refresh_memberships(&mut doc);
    store::update_json(&questions_path, &doc)?;
    Ok(format!(
        "[SUCCESS] Merged {} questions into {}/questions.json",
        merged, phase
    ))
}

/// Recomputes each manifest's `question_ids` from question tags, in
/// (order, id) sequence, and refreshes the mode-switcher count labels.
/// Section membership is authored directly and left alone.
pub fn refresh_memberships(doc: &mut Value) {
    let members: BTreeMap<String, Vec<String>> = {
        let Some(questions) = doc.get("questions").and_then(Value::as_object) else {
            return;
        };
        let Some(manifests) = doc.get("manifests").and_then(Value::as_object) else {
            return;
        };
        manifests
            .keys()
            .map(|name| {
                let mut rows: Vec<(i64, &String)> = questions
                    .iter()
                    .filter(|(_, q)| is_tagged_for(q, name))
                    .map(|(qid, q)| {
                        (q.get("order").and_then(Value::as_i64).unwrap_or(0), qid)
                    })
                    .collect();
                rows.sort();
                let ids = rows.into_iter().map(|(_, qid)| qid.clone()).collect();
                (name.clone(), ids)
            })
            .collect()
    };

    for (name, ids) in &members {
        if let Some(manifest) = doc
            .get_mut("manifests")
            .and_then(|m| m.get_mut(name.as_str()))
        {
            manifest["question_ids"] = json!(ids);
        }
        if let Some(options) = doc
            .pointer_mut("/ui_hints/controls/mode_switcher/options")
            .and_then(Value::as_array_mut)
        {
            for option in options {
                if option.get("id").and_then(Value::as_str) == Some(name.as_str()) {
                    option["label"] = json!(format!("{} ({})", capitalize(name), ids.len()));
                }
            }
        }
    }
}

fn is_tagged_for(question: &Value, manifest: &str) -> bool {
    question
        .pointer("/tags/included_in_manifests")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().any(|t| t.as_str() == Some(manifest)))
        .unwrap_or(false)
}
