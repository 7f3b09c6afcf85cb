//! Cross-phase question search with composable filters.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::services::store;
use crate::{Context, Result};

/// Types that can appear on a stored question. Standalone ranked selects never
/// exist, so they are not searchable.
const SEARCHABLE_TYPES: [&str; 4] =
    ["free_text", "single_select", "multi_select", "compound"];
const MISSING_KEYS: [&str; 3] = ["examples", "validation", "options"];

/// Prompts longer than this are omitted from text output to keep rows scannable.
const MAX_INLINE_PROMPT: usize = 80;

#[derive(Default)]
pub struct SearchFilters<'a> {
    pub text: Option<&'a str>,
    pub question_type: Option<&'a str>,
    pub section: Option<&'a str>,
    pub manifest: Option<&'a str>,
    pub exclude: bool,
    pub missing: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SearchRow {
    pub phase: String,
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub section: String,
    pub prompt: String,
    pub manifests: String,
}

pub fn search(
    data_dir: &Path,
    phase: Option<&str>,
    filters: &SearchFilters,
    format_name: &str,
    output: Option<&Path>,
) -> Result<String> {
    check_filters(filters)?;
    if !matches!(format_name, "text" | "json" | "count" | "ids") {
        anyhow::bail!("Unknown format '{}'. Use text, json, count, or ids.", format_name);
    }

    let phases = match phase {
        Some(phase) => {
            store::require_phase(data_dir, phase)?;
            vec![phase.to_string()]
        }
        None => store::discover_phases(data_dir)?,
    };

    let mut rows = Vec::new();
    for phase in &phases {
        let path = store::questions_path(data_dir, phase);
        if !path.exists() {
            continue;
        }
        let doc = store::load_json(&path)?;
        collect_matches(phase, &doc, filters, &mut rows);
    }

    let rendered = render(&rows, format_name)?;
    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(format!("✓ Results saved to: {}", path.display()))
        }
        None => Ok(rendered),
    }
}

fn check_filters(filters: &SearchFilters) -> Result<()> {
    if filters.exclude && filters.manifest.is_none() {
        anyhow::bail!("--exclude requires --manifest");
    }
    if let Some(t) = filters.question_type {
        if !SEARCHABLE_TYPES.contains(&t) {
            anyhow::bail!(
                "Invalid type '{}'. Must be one of: {}",
                t,
                SEARCHABLE_TYPES.join(", ")
            );
        }
    }
    if let Some(key) = filters.missing {
        if !MISSING_KEYS.contains(&key) {
            anyhow::bail!(
                "Invalid --missing value '{}'. Use {}",
                key,
                MISSING_KEYS.join(", ")
            );
        }
    }
    Ok(())
}

fn collect_matches(phase: &str, doc: &Value, filters: &SearchFilters, rows: &mut Vec<SearchRow>) {
    let Some(questions) = doc.get("questions").and_then(Value::as_object) else {
        return;
    };
    // Membership comes from the manifests' own question_ids lists, so the
    // filter sees exactly what the app would serve.
    let members: Option<HashSet<&str>> = filters.manifest.map(|name| {
        doc.pointer(&format!("/manifests/{}/question_ids", name))
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    });

    for (qid, q) in questions {
        if !matches_filters(qid, q, filters, members.as_ref()) {
            continue;
        }
        rows.push(SearchRow {
            phase: phase.to_string(),
            id: qid.clone(),
            title: q["title"].as_str().unwrap_or_default().to_string(),
            question_type: q["type"].as_str().unwrap_or_default().to_string(),
            section: q["section_id"].as_str().unwrap_or_default().to_string(),
            prompt: q["prompt"].as_str().unwrap_or_default().to_string(),
            manifests: manifest_names(q),
        });
    }
}

fn matches_filters(
    qid: &str,
    q: &Value,
    filters: &SearchFilters,
    members: Option<&HashSet<&str>>,
) -> bool {
    if let Some(t) = filters.question_type {
        if q.get("type").and_then(Value::as_str) != Some(t) {
            return false;
        }
    }
    if let Some(section) = filters.section {
        if q.get("section_id").and_then(Value::as_str) != Some(section) {
            return false;
        }
    }
    if let Some(needle) = filters.text {
        if !text_matches(q, needle) {
            return false;
        }
    }
    if let Some(members) = members {
        let is_member = members.contains(qid);
        if filters.exclude == is_member {
            return false;
        }
    }
    if let Some(key) = filters.missing {
        if !is_missing(q, key) {
            return false;
        }
    }
    true
}

fn text_matches(q: &Value, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let contains = |value: &Value| {
        value
            .as_str()
            .map(|s| s.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };
    if q.get("title").map(contains).unwrap_or(false)
        || q.get("prompt").map(contains).unwrap_or(false)
    {
        return true;
    }
    q.get("options")
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .any(|o| o.get("label").map(contains).unwrap_or(false))
        })
        .unwrap_or(false)
}

fn is_missing(q: &Value, key: &str) -> bool {
    match q.get(key) {
        None => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn manifest_names(q: &Value) -> String {
    let names: Vec<&str> = q
        .pointer("/tags/included_in_manifests")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn render(rows: &[SearchRow], format_name: &str) -> Result<String> {
    match format_name {
        "json" => Ok(serde_json::to_string_pretty(rows)?),
        "count" => Ok(format!("Found {} questions", rows.len())),
        "ids" => Ok(rows
            .iter()
            .map(|r| r.id.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
        _ => Ok(render_text(rows)),
    }
}

fn render_text(rows: &[SearchRow]) -> String {
    if rows.is_empty() {
        return "No questions found matching criteria".to_string();
    }
    let mut lines = vec![format!("Found {} questions:", rows.len()), String::new()];
    for row in rows {
        lines.push(format!("{} [{}] - {}", row.id, row.question_type, row.title));
        lines.push(format!(
            "  Phase: {}, Section: {}, Manifests: {}",
            row.phase, row.section, row.manifests
        ));
        if row.prompt.len() < MAX_INLINE_PROMPT {
            lines.push(format!("  Prompt: {}", row.prompt));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}
