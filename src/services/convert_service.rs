//! Conversion of a question-bank text file into a phase content directory.

use std::fs;
use std::path::Path;

use crate::config::AuthoringConfig;
use crate::parser::aggregate::{capitalize, manifest_display_order};
use crate::parser::{build_document, BankParser};
use crate::services::store;
use crate::{Context, Result};

/// Parses `input`, assembles the document, and writes `questions.json` plus
/// one shard per question under `questions/` in the output directory.
pub fn convert(input: &Path, out_dir: &Path, config_path: Option<&Path>) -> Result<String> {
    let config = AuthoringConfig::resolve(config_path, input)?;
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let parser = BankParser::new()?;
    let bank = parser.parse(&text, &config);
    if bank.questions.is_empty() {
        anyhow::bail!("No question blocks found in {}", input.display());
    }
    let (document, aggregate_warnings) = build_document(bank.sections, bank.questions, &config);

    store::write_json(
        &out_dir.join(store::QUESTIONS_FILE),
        &serde_json::to_value(&document)?,
    )?;
    let shards_dir = out_dir.join(store::SHARDS_DIR);
    for (qid, question) in &document.questions {
        store::write_json(
            &shards_dir.join(format!("{}.json", qid)),
            &serde_json::to_value(question)?,
        )?;
    }

    let mut lines: Vec<String> = bank
        .warnings
        .iter()
        .chain(&aggregate_warnings)
        .map(|w| format!("Warning: {}", w))
        .collect();
    lines.push("Successfully generated questions.json".to_string());
    lines.push(format!("  - Questions: {}", document.questions.len()));
    lines.push(format!("  - Sections: {}", document.sections.len()));

    let mut names: Vec<&String> = document.manifests.keys().collect();
    names.sort_by_key(|name| manifest_display_order(name));
    for name in names {
        lines.push(format!(
            "  - {} count: {}",
            capitalize(name),
            document.manifests[name.as_str()].question_ids.len()
        ));
    }
    Ok(lines.join("\n"))
}
