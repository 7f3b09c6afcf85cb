//! On-disk layout and safe JSON persistence for phase content.
//!
//! A data directory holds one subdirectory per phase (`phase_1`, `phase_2`,
//! ...), each with `questions.json`, `prompts.json`, and an optional
//! `questions/` shard directory for per-question working copies.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{Context, Result};

pub const QUESTIONS_FILE: &str = "questions.json";
pub const PROMPTS_FILE: &str = "prompts.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const SHARDS_DIR: &str = "questions";

pub fn phase_dir(data_dir: &Path, phase: &str) -> PathBuf {
    data_dir.join(phase)
}

pub fn questions_path(data_dir: &Path, phase: &str) -> PathBuf {
    phase_dir(data_dir, phase).join(QUESTIONS_FILE)
}

pub fn prompts_path(data_dir: &Path, phase: &str) -> PathBuf {
    phase_dir(data_dir, phase).join(PROMPTS_FILE)
}

/// Phase subdirectories of the data directory, sorted by name.
pub fn discover_phases(data_dir: &Path) -> Result<Vec<String>> {
    if !data_dir.is_dir() {
        anyhow::bail!("Data directory not found: {}", data_dir.display());
    }
    let mut phases = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with("phase") {
            phases.push(name);
        }
    }
    phases.sort();
    Ok(phases)
}

/// Resolves one phase directory, failing when it does not exist.
pub fn require_phase(data_dir: &Path, phase: &str) -> Result<PathBuf> {
    if !data_dir.is_dir() {
        anyhow::bail!("Data directory not found: {}", data_dir.display());
    }
    let dir = phase_dir(data_dir, phase);
    if !dir.is_dir() {
        anyhow::bail!("Phase directory not found: {}", phase);
    }
    Ok(dir)
}

pub fn load_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Writes JSON atomically: the content lands in a temp file next to the
/// target and replaces it in one rename.
pub fn write_json(path: &Path, doc: &Value) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to stage write for {}", path.display()))?;
    serde_json::to_writer_pretty(&mut tmp, doc)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| e.error)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Like [`write_json`], but keeps the previous content in a `.bak` sibling
/// first. Used by every edit of an existing document.
pub fn update_json(path: &Path, doc: &Value) -> Result<()> {
    if path.exists() {
        let backup = path.with_extension("json.bak");
        fs::copy(path, &backup)
            .with_context(|| format!("Failed to back up {}", path.display()))?;
    }
    write_json(path, doc)
}
