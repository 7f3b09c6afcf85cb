//! Section management against a phase's questions.json.

use std::path::Path;

use serde_json::{json, Value};

use crate::services::store;
use crate::Result;

pub fn add(
    data_dir: &Path,
    phase: &str,
    id: &str,
    title: &str,
    order: Option<usize>,
) -> Result<String> {
    if !id.starts_with('s') {
        anyhow::bail!("Section ID must start with 's' (e.g., s1, s2)");
    }
    store::require_phase(data_dir, phase)?;
    let path = store::questions_path(data_dir, phase);
    let mut doc = load_document(&path)?;

    let sections = sections_mut(&mut doc, &path)?;
    if sections
        .iter()
        .any(|s| s.get("id").and_then(Value::as_str) == Some(id))
    {
        anyhow::bail!("Section {} already exists", id);
    }
    let entry = json!({"id": id, "title": title, "question_ids": []});
    match order {
        Some(order) => {
            let index = order.saturating_sub(1).min(sections.len());
            sections.insert(index, entry);
        }
        None => sections.push(entry),
    }
    store::update_json(&path, &doc)?;
    Ok(format!("[SUCCESS] Added section {}: {}", id, title))
}

/// Refuses to drop a section that still owns questions; the caller decides
/// where those go first.
pub fn remove(data_dir: &Path, phase: &str, id: &str) -> Result<String> {
    store::require_phase(data_dir, phase)?;
    let path = store::questions_path(data_dir, phase);
    let mut doc = load_document(&path)?;

    let sections = sections_mut(&mut doc, &path)?;
    let Some(index) = position_of(sections, id) else {
        anyhow::bail!("Section {} not found", id);
    };
    let count = sections[index]
        .get("question_ids")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    if count > 0 {
        anyhow::bail!(
            "Section {} contains {} question(s). Remove or move questions first.",
            id,
            count
        );
    }
    sections.remove(index);
    store::update_json(&path, &doc)?;
    Ok(format!("[SUCCESS] Removed section {}", id))
}

pub fn rename(data_dir: &Path, phase: &str, id: &str, title: &str) -> Result<String> {
    store::require_phase(data_dir, phase)?;
    let path = store::questions_path(data_dir, phase);
    let mut doc = load_document(&path)?;

    let sections = sections_mut(&mut doc, &path)?;
    let Some(index) = position_of(sections, id) else {
        anyhow::bail!("Section {} not found", id);
    };
    sections[index]["title"] = json!(title);
    store::update_json(&path, &doc)?;
    Ok(format!("[SUCCESS] Renamed section {} to: {}", id, title))
}

/// Moves a section to a 1-based position, clamping out-of-range targets to
/// the ends of the list.
pub fn reorder(data_dir: &Path, phase: &str, id: &str, position: usize) -> Result<String> {
    store::require_phase(data_dir, phase)?;
    let path = store::questions_path(data_dir, phase);
    let mut doc = load_document(&path)?;

    let sections = sections_mut(&mut doc, &path)?;
    let Some(from) = position_of(sections, id) else {
        anyhow::bail!("Section {} not found", id);
    };
    let section = sections.remove(from);
    let to = position.saturating_sub(1).min(sections.len());
    sections.insert(to, section);
    store::update_json(&path, &doc)?;
    Ok(format!("[SUCCESS] Moved section {} to position {}", id, position))
}

pub fn list(data_dir: &Path, phase: &str, as_json: bool) -> Result<String> {
    store::require_phase(data_dir, phase)?;
    let path = store::questions_path(data_dir, phase);
    let doc = load_document(&path)?;
    let sections = doc["sections"].as_array().cloned().unwrap_or_default();
    if as_json {
        return Ok(serde_json::to_string_pretty(&sections)?);
    }

    let mut lines = vec![format!("Sections in {}:", phase)];
    for (i, section) in sections.iter().enumerate() {
        lines.push(format!(
            "{}. [{}] {}",
            i + 1,
            section["id"].as_str().unwrap_or_default(),
            section["title"].as_str().unwrap_or_default()
        ));
        let ids: Vec<&str> = section["question_ids"]
            .as_array()
            .map(|ids| ids.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        lines.push(format!("   Questions: {}", ids.len()));
        if !ids.is_empty() {
            lines.push(format!("   IDs: {}", ids.join(", ")));
        }
        lines.push(String::new());
    }
    lines.push(format!("Total sections: {}", sections.len()));
    Ok(lines.join("\n"))
}

fn load_document(path: &Path) -> Result<Value> {
    let doc = store::load_json(path)?;
    if doc.get("sections").and_then(Value::as_array).is_none() {
        anyhow::bail!("No 'sections' array in {}", path.display());
    }
    Ok(doc)
}

fn sections_mut<'a>(doc: &'a mut Value, path: &Path) -> Result<&'a mut Vec<Value>> {
    match doc["sections"].as_array_mut() {
        Some(sections) => Ok(sections),
        None => anyhow::bail!("No 'sections' array in {}", path.display()),
    }
}

fn position_of(sections: &[Value], id: &str) -> Option<usize> {
    sections
        .iter()
        .position(|s| s.get("id").and_then(Value::as_str) == Some(id))
}
