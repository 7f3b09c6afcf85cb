//! Normalizes typographic characters out of phase JSON files.
//!
//! Content pasted from word processors arrives with curly quotes, long
//! dashes and ellipsis characters that render inconsistently in the app.
//! Straight double quotes are removed outright since answer text is
//! displayed inside quoted UI chrome already.

use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::services::store;
use crate::Result;

pub fn clean(data_dir: &Path, phase: Option<&str>) -> Result<String> {
    let dir = match phase {
        Some(phase) => store::require_phase(data_dir, phase)?,
        None => data_dir.to_path_buf(),
    };

    let files = json_files(&dir);
    let mut lines = vec![format!("Cleaning {} files in {}...", files.len(), dir.display())];
    for path in &files {
        let mut doc = store::load_json(path)?;
        if scrub_node(&mut doc) {
            store::write_json(path, &doc)?;
        }
    }
    lines.push(format!("Finished. Processed {} files.", files.len()));
    Ok(lines.join("\n"))
}

fn json_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect()
}

/// Rewrites every string in the tree, reporting whether anything changed.
fn scrub_node(value: &mut Value) -> bool {
    match value {
        Value::String(s) => {
            let cleaned = scrub_string(s);
            if cleaned != *s {
                *s = cleaned;
                true
            } else {
                false
            }
        }
        Value::Array(items) => items
            .iter_mut()
            .fold(false, |changed, item| scrub_node(item) || changed),
        Value::Object(map) => map
            .values_mut()
            .fold(false, |changed, item| scrub_node(item) || changed),
        _ => false,
    }
}

fn scrub_string(raw: &str) -> String {
    let mut replaced = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\u{201C}' | '\u{201D}' => replaced.push('"'),
            '\u{2018}' | '\u{2019}' => replaced.push('\''),
            '\u{2013}' | '\u{2014}' => replaced.push('-'),
            '\u{2026}' => replaced.push_str("..."),
            ch => replaced.push(ch),
        }
    }
    let stripped: String = replaced.chars().filter(|&ch| ch != '"').collect();
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_scrub_string_normalizes_typography() {
        assert_eq!(scrub_string("\u{201C}Hello\u{201D} there\u{2026}"), "Hello there...");
        assert_eq!(scrub_string("it\u{2019}s fine \u{2014} mostly"), "it's fine - mostly");
        assert_eq!(scrub_string("  say \"less\"  "), "say less");
        assert_eq!(scrub_string("already clean"), "already clean");
    }

    #[test]
    fn test_clean_rewrites_phase_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = store::questions_path(temp_dir.path(), "phase_1");
        let doc = json!({
            "sections": [],
            "questions": {
                "q01": {"title": "\u{201C}Big\u{201D} wins", "examples": ["one\u{2026}", "two"]}
            }
        });
        store::write_json(&path, &doc).unwrap();

        let message = clean(temp_dir.path(), Some("phase_1")).unwrap();
        assert!(message.starts_with("Cleaning 1 files in"));
        assert!(message.ends_with("Finished. Processed 1 files."));

        let cleaned = store::load_json(&path).unwrap();
        assert_eq!(cleaned["questions"]["q01"]["title"], "Big wins");
        assert_eq!(cleaned["questions"]["q01"]["examples"][0], "one...");
        assert_eq!(cleaned["questions"]["q01"]["examples"][1], "two");
    }

    #[test]
    fn test_clean_scopes_to_requested_phase() {
        let temp_dir = TempDir::new().unwrap();
        let touched = store::questions_path(temp_dir.path(), "phase_1");
        let untouched = store::questions_path(temp_dir.path(), "phase_2");
        store::write_json(&touched, &json!({"note": "a\u{2013}b"})).unwrap();
        store::write_json(&untouched, &json!({"note": "a\u{2013}b"})).unwrap();

        clean(temp_dir.path(), Some("phase_1")).unwrap();
        assert_eq!(store::load_json(&touched).unwrap()["note"], "a-b");
        assert_eq!(store::load_json(&untouched).unwrap()["note"], "a\u{2013}b");

        // No phase filter covers everything under the data directory.
        let message = clean(temp_dir.path(), None).unwrap();
        assert!(message.starts_with("Cleaning 2 files in"));
        assert_eq!(store::load_json(&untouched).unwrap()["note"], "a-b");
    }
}
