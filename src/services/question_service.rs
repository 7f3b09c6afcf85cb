//! Single-question CRUD against a phase's questions.json.
//!
//! Every mutation rewrites the document through [`store::update_json`] so a
//! `.bak` copy of the previous state is always left behind, and manifest
//! memberships are recomputed from tags before saving.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::models::QuestionType;
use crate::services::merge_service::refresh_memberships;
use crate::services::store;
use crate::Result;

/// Fields an imported question must carry before it is accepted.
const REQUIRED_IMPORT_FIELDS: [&str; 9] = [
    "id",
    "section_id",
    "order",
    "title",
    "prompt",
    "type",
    "answer_schema",
    "tags",
    "examples",
];

/// Everything needed to author a new question from the command line.
pub struct NewQuestion<'a> {
    pub section: &'a str,
    pub question_type: &'a str,
    pub title: &'a str,
    pub prompt: &'a str,
    pub options: Option<&'a str>,
    pub manifests: Option<&'a str>,
    pub examples: Option<&'a str>,
}

pub struct ImportOptions<'a> {
    pub section: Option<&'a str>,
    pub manifests: Option<&'a str>,
    pub overwrite: bool,
}

pub fn add(data_dir: &Path, phase: &str, draft: &NewQuestion) -> Result<String> {
    store::require_phase(data_dir, phase)?;
    let path = store::questions_path(data_dir, phase);
    let mut doc = load_document(&path)?;

    let qtype = match QuestionType::from_name(draft.question_type) {
        Some(QuestionType::RankedSelect) => anyhow::bail!(
            "ranked_select questions are authored as compound blocks. \
             Use type compound with a ranked_select field."
        ),
        Some(qtype) => qtype,
        None => anyhow::bail!(
            "Invalid type '{}'. Must be one of: {}",
            draft.question_type,
            QuestionType::vocabulary()
        ),
    };
    if !section_exists(&doc, draft.section) {
        anyhow::bail!("Section {} not found", draft.section);
    }

    let manifests = parse_manifests(&doc, draft.manifests)?;
    let is_select = matches!(qtype, QuestionType::SingleSelect | QuestionType::MultiSelect);
    let options = match (draft.options, is_select) {
        (Some(raw), true) => Some(parse_options(raw)?),
        (None, true) => anyhow::bail!("{} questions require --options", qtype.name()),
        (Some(_), false) => {
            anyhow::bail!("--options only applies to select-type questions")
        }
        (None, false) => None,
    };

    let id = next_question_id(&doc);
    let order = next_order(&doc, draft.section);
    let mut question = json!({
        "id": id,
        "section_id": draft.section,
        "order": order,
        "title": draft.title,
        "prompt": draft.prompt,
        "type": qtype.name(),
        "answer_schema": default_answer_schema(qtype),
        "tags": {"included_in_manifests": manifests},
        "examples": split_csv(draft.examples.unwrap_or("")),
    });
    if let Some(options) = options {
        question["options"] = Value::Array(options);
    }
    if qtype == QuestionType::Compound {
        question["fields"] = json!([]);
    }

    doc["questions"][&id] = question;
    attach_to_section(&mut doc, draft.section, &id);
    refresh_memberships(&mut doc);
    store::update_json(&path, &doc)?;

    let mut message = format!(
        "[SUCCESS] Added {} to {}/{} (manifests: {})",
        id,
        phase,
        draft.section,
        manifest_list(&doc, &id)
    );
    if qtype == QuestionType::Compound {
        message.push_str(
            "\nNOTE: compound questions start with an empty fields array. \
             Edit questions.json or import a full definition to fill it in.",
        );
    }
    Ok(message)
}

pub fn update(data_dir: &Path, phase: &str, id: &str, field: &str, value: &str) -> Result<String> {
    store::require_phase(data_dir, phase)?;
    let path = store::questions_path(data_dir, phase);
    let mut doc = load_document(&path)?;
    if doc["questions"].get(id).is_none() {
        anyhow::bail!("Question {} not found in {}", id, phase);
    }

    match field {
        "title" | "prompt" => doc["questions"][id][field] = json!(value),
        "type" => {
            if QuestionType::from_name(value).is_none() {
                anyhow::bail!(
                    "Invalid type '{}'. Must be one of: {}",
                    value,
                    QuestionType::vocabulary()
                );
            }
            doc["questions"][id]["type"] = json!(value);
        }
        "section_id" => {
            if !section_exists(&doc, value) {
                anyhow::bail!("Section {} not found", value);
            }
            doc["questions"][id]["section_id"] = json!(value);
            detach_from_sections(&mut doc, id);
            attach_to_section(&mut doc, value, id);
        }
        "order" => {
            let order: i64 = match value.parse() {
                Ok(order) => order,
                Err(_) => anyhow::bail!("Order must be a number"),
            };
            doc["questions"][id]["order"] = json!(order);
        }
        "examples" => doc["questions"][id]["examples"] = json!(split_csv(value)),
        other => anyhow::bail!(
            "Field '{}' not supported for direct update. Use specialized commands.",
            other
        ),
    }

    refresh_memberships(&mut doc);
    store::update_json(&path, &doc)?;
    Ok(format!("[SUCCESS] Updated {}.{}", id, field))
}

pub fn delete(data_dir: &Path, phase: &str, id: &str) -> Result<String> {
    store::require_phase(data_dir, phase)?;
    let path = store::questions_path(data_dir, phase);
    let mut doc = load_document(&path)?;

    let removed = doc["questions"]
        .as_object_mut()
        .map(|questions| questions.remove(id).is_some())
        .unwrap_or(false);
    if !removed {
        anyhow::bail!("Question {} not found in {}", id, phase);
    }
    detach_from_sections(&mut doc, id);
    refresh_memberships(&mut doc);
    store::update_json(&path, &doc)?;
    Ok(format!("[SUCCESS] Deleted {} from {}", id, phase))
}

pub fn get(data_dir: &Path, phase: &str, id: &str, as_json: bool) -> Result<String> {
    store::require_phase(data_dir, phase)?;
    let doc = load_document(&store::questions_path(data_dir, phase))?;
    let Some(question) = doc["questions"].get(id) else {
        anyhow::bail!("Question {} not found in {}", id, phase);
    };
    if as_json {
        return Ok(serde_json::to_string_pretty(question)?);
    }

    let mut lines = vec![
        format!(
            "[{}] {}",
            id,
            question["title"].as_str().unwrap_or_default()
        ),
        format!("Type: {}", question["type"].as_str().unwrap_or_default()),
        format!(
            "Section: {}",
            question["section_id"].as_str().unwrap_or_default()
        ),
        format!("Order: {}", question["order"].as_i64().unwrap_or_default()),
        format!("Prompt: {}", question["prompt"].as_str().unwrap_or_default()),
    ];
    if let Some(options) = question.get("options").and_then(Value::as_array) {
        lines.push(format!("Options ({}):", options.len()));
        for option in options {
            lines.push(format!(
                "  - {}: {}",
                option["value"].as_str().unwrap_or_default(),
                option["label"].as_str().unwrap_or_default()
            ));
        }
    }
    let example_count = question
        .get("examples")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    lines.push(format!("Examples: {}", example_count));
    lines.push(format!("Manifests: {}", manifest_list(&doc, id)));
    Ok(lines.join("\n"))
}

pub fn import(data_dir: &Path, phase: &str, file: &Path, opts: &ImportOptions) -> Result<String> {
    store::require_phase(data_dir, phase)?;
    let path = store::questions_path(data_dir, phase);
    let mut doc = load_document(&path)?;

    let source = resolve_import_path(data_dir, phase, file)?;
    let mut question = store::load_json(&source)?;

    if let Some(section) = opts.section {
        question["section_id"] = json!(section);
    }
    if let Some(manifests) = opts.manifests {
        question["tags"] = json!({"included_in_manifests": split_csv(manifests)});
    }
    let id = match question.get("id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let id = next_question_id(&doc);
            question["id"] = json!(id);
            id
        }
    };
    if question.get("order").and_then(Value::as_i64).is_none() {
        if let Some(section) = question.get("section_id").and_then(Value::as_str) {
            let order = next_order(&doc, section);
            question["order"] = json!(order);
        }
    }
    validate_import(&doc, &question)?;

    if doc["questions"].get(&id).is_some() && !opts.overwrite {
        anyhow::bail!("Question {} already exists. Use --overwrite to replace.", id);
    }
    // Cloned before the move so the section list can still be updated below.
    let section_id = question["section_id"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    doc["questions"][&id] = question;
    detach_from_sections(&mut doc, &id);
    attach_to_section(&mut doc, &section_id, &id);
    refresh_memberships(&mut doc);
    store::update_json(&path, &doc)?;
    Ok(format!(
        "[SUCCESS] Imported {} into {}/{}",
        id, phase, section_id
    ))
}

fn load_document(path: &Path) -> Result<Value> {
    let doc = store::load_json(path)?;
    if doc.get("questions").and_then(Value::as_object).is_none() {
        anyhow::bail!("No 'questions' object in {}", path.display());
    }
    Ok(doc)
}

fn resolve_import_path(data_dir: &Path, phase: &str, file: &Path) -> Result<PathBuf> {
    if file.is_absolute() {
        if file.exists() {
            return Ok(file.to_path_buf());
        }
        anyhow::bail!("File not found: {}", file.display());
    }
    let shard = store::phase_dir(data_dir, phase)
        .join(store::SHARDS_DIR)
        .join(file);
    if shard.exists() {
        return Ok(shard);
    }
    if file.exists() {
        return Ok(file.to_path_buf());
    }
    anyhow::bail!("File not found: {}", file.display())
}

fn validate_import(doc: &Value, question: &Value) -> Result<()> {
    for field in REQUIRED_IMPORT_FIELDS {
        if question.get(field).is_none() {
            anyhow::bail!("Missing required field '{}'", field);
        }
    }
    let qtype = question["type"].as_str().unwrap_or_default();
    if QuestionType::from_name(qtype).is_none() {
        anyhow::bail!(
            "Invalid type '{}'. Must be one of: {}",
            qtype,
            QuestionType::vocabulary()
        );
    }
    if matches!(qtype, "single_select" | "multi_select") {
        let has_options = question
            .get("options")
            .and_then(Value::as_array)
            .map(|options| !options.is_empty())
            .unwrap_or(false);
        if !has_options {
            anyhow::bail!("{} requires a non-empty options array", qtype);
        }
    }
    let section_id = question["section_id"].as_str().unwrap_or_default();
    if !section_exists(doc, section_id) {
        anyhow::bail!("Section {} not found", section_id);
    }
    let known: Vec<&str> = doc["manifests"]
        .as_object()
        .map(|m| m.keys().map(String::as_str).collect())
        .unwrap_or_default();
    if let Some(names) = question
        .pointer("/tags/included_in_manifests")
        .and_then(Value::as_array)
    {
        for name in names.iter().filter_map(Value::as_str) {
            if !known.contains(&name) {
                anyhow::bail!("Unknown manifest '{}'. Available: {}", name, known.join(", "));
            }
        }
    }
    Ok(())
}

fn next_question_id(doc: &Value) -> String {
    let max = doc["questions"]
        .as_object()
        .map(|questions| {
            questions
                .keys()
                .filter_map(|id| id.strip_prefix('q'))
                .filter_map(|digits| digits.parse::<u32>().ok())
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0);
    format!("q{:02}", max + 1)
}

fn next_order(doc: &Value, section_id: &str) -> i64 {
    doc["questions"]
        .as_object()
        .map(|questions| {
            questions
                .values()
                .filter(|q| q.get("section_id").and_then(Value::as_str) == Some(section_id))
                .filter_map(|q| q.get("order").and_then(Value::as_i64))
                .max()
                .map(|max| max + 1)
                .unwrap_or(1)
        })
        .unwrap_or(1)
}

fn parse_manifests(doc: &Value, arg: Option<&str>) -> Result<Vec<String>> {
    let names = match arg {
        Some(csv) => split_csv(csv),
        None => vec!["full".to_string()],
    };
    let known: Vec<&str> = doc["manifests"]
        .as_object()
        .map(|m| m.keys().map(String::as_str).collect())
        .unwrap_or_default();
    for name in &names {
        if !known.contains(&name.as_str()) {
            anyhow::bail!("Unknown manifest '{}'. Available: {}", name, known.join(", "));
        }
    }
    Ok(names)
}

fn parse_options(raw: &str) -> Result<Vec<Value>> {
    let mut options = Vec::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((value, label)) = pair.split_once(':') else {
            anyhow::bail!("Invalid option format: '{}'. Use value:label", pair);
        };
        let (value, label) = (value.trim(), label.trim());
        if value.is_empty() || label.is_empty() {
            anyhow::bail!("Invalid option format: '{}'. Use value:label", pair);
        }
        options.push(json!({"value": value, "label": label}));
    }
    Ok(options)
}

fn default_answer_schema(qtype: QuestionType) -> Value {
    match qtype {
        QuestionType::FreeText => json!({"text": ""}),
        QuestionType::SingleSelect => {
            json!({"selected_value": "", "other_text": "", "notes": ""})
        }
        QuestionType::MultiSelect => {
            json!({"selected_values": [], "other_text": "", "ranking": [], "notes": ""})
        }
        QuestionType::Compound | QuestionType::RankedSelect => json!({}),
    }
}

fn section_exists(doc: &Value, section_id: &str) -> bool {
    doc["sections"]
        .as_array()
        .map(|sections| {
            sections
                .iter()
                .any(|s| s.get("id").and_then(Value::as_str) == Some(section_id))
        })
        .unwrap_or(false)
}

fn attach_to_section(doc: &mut Value, section_id: &str, id: &str) {
    let Some(sections) = doc["sections"].as_array_mut() else {
        return;
    };
    for section in sections {
        if section.get("id").and_then(Value::as_str) != Some(section_id) {
            continue;
        }
        match section.get_mut("question_ids").and_then(Value::as_array_mut) {
            Some(ids) => {
                if !ids.iter().any(|v| v.as_str() == Some(id)) {
                    ids.push(json!(id));
                }
            }
            None => section["question_ids"] = json!([id]),
        }
    }
}

fn detach_from_sections(doc: &mut Value, id: &str) {
    let Some(sections) = doc["sections"].as_array_mut() else {
        return;
    };
    for section in sections {
        if let Some(ids) = section.get_mut("question_ids").and_then(Value::as_array_mut) {
            ids.retain(|v| v.as_str() != Some(id));
        }
    }
}

fn manifest_list(doc: &Value, id: &str) -> String {
    let names: Vec<&str> = doc["questions"][id]
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

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
