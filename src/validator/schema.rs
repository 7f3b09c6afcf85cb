//! Schema and referential-integrity checks over a question document.
//!
//! The validator works on raw JSON values rather than the typed model so a
//! half-broken document still gets itemized findings instead of one
//! deserialization failure.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::models::{PhaseReport, QuestionType};

/// Named checks, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Structure,
    Types,
    References,
    Manifests,
    Options,
    Fields,
    Duplicates,
    Orphans,
    BestPractices,
    Syntax,
}

#[derive(Debug, Error)]
#[error("unknown check '{0}'")]
pub struct UnknownCheck(pub String);

impl Check {
    pub const ALL: [Check; 10] = [
        Check::Structure,
        Check::Types,
        Check::References,
        Check::Manifests,
        Check::Options,
        Check::Fields,
        Check::Duplicates,
        Check::Orphans,
        Check::BestPractices,
        Check::Syntax,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Check::Structure => "structure",
            Check::Types => "types",
            Check::References => "references",
            Check::Manifests => "manifests",
            Check::Options => "options",
            Check::Fields => "fields",
            Check::Duplicates => "duplicates",
            Check::Orphans => "orphans",
            Check::BestPractices => "best_practices",
            Check::Syntax => "syntax",
        }
    }

    fn run(&self, doc: &Value, findings: &mut Findings) {
        match self {
            Check::Structure => check_structure(doc, findings),
            Check::Types => check_types(doc, findings),
            Check::References => check_references(doc, findings),
            Check::Manifests => check_manifests(doc, findings),
            Check::Options => check_options(doc, findings),
            Check::Fields => check_fields(doc, findings),
            Check::Duplicates => check_duplicates(doc, findings),
            Check::Orphans => check_orphans(doc, findings),
            Check::BestPractices => check_best_practices(doc, findings),
            Check::Syntax => check_syntax(doc, findings),
        }
    }
}

impl FromStr for Check {
    type Err = UnknownCheck;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Check::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| UnknownCheck(name.to_string()))
    }
}

#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Runs a configurable subset of checks against one document.
pub struct SchemaValidator {
    checks: Vec<Check>,
    strict: bool,
}

impl SchemaValidator {
    pub fn new(strict: bool) -> Self {
        Self::with_checks(Check::ALL.to_vec(), strict)
    }

    pub fn with_checks(checks: Vec<Check>, strict: bool) -> Self {
        Self { checks, strict }
    }

    pub fn validate_file(&self, phase: &str, path: &Path) -> PhaseReport {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => return PhaseReport::load_error(phase, format!("Cannot read file: {}", e)),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(doc) => self.validate_value(phase, &doc),
            Err(e) => PhaseReport::load_error(phase, format!("Invalid JSON: {}", e)),
        }
    }

    pub fn validate_value(&self, phase: &str, doc: &Value) -> PhaseReport {
        let mut findings = Findings::default();
        for check in &self.checks {
            check.run(doc, &mut findings);
        }
        // Strict mode promotes every warning to an error before the status
        // is decided.
        if self.strict {
            findings.errors.append(&mut findings.warnings);
        }
        let checks_run = self.checks.iter().map(|c| c.name().to_string()).collect();
        PhaseReport::from_findings(phase, findings.errors, findings.warnings, checks_run)
    }
}

const REQUIRED_QUESTION_FIELDS: [&str; 8] = [
    "id",
    "section_id",
    "order",
    "title",
    "prompt",
    "type",
    "answer_schema",
    "tags",
];

fn questions_of(doc: &Value) -> Option<&serde_json::Map<String, Value>> {
    doc.get("questions")?.as_object()
}

fn sections_of(doc: &Value) -> &[Value] {
    doc.get("sections")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn string_items(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn question_id_set(doc: &Value) -> HashSet<&str> {
    questions_of(doc)
        .map(|qs| qs.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

fn check_structure(doc: &Value, findings: &mut Findings) {
    if !doc.is_object() {
        findings.errors.push("Root must be a JSON object".to_string());
        return;
    }
    if doc.get("sections").and_then(Value::as_array).is_none() {
        findings.errors.push("Missing 'sections' array".to_string());
    }
    if doc.get("questions").and_then(Value::as_object).is_none() {
        findings.errors.push("Missing 'questions' object".to_string());
    }
    if doc.get("manifests").and_then(Value::as_object).is_none() {
        findings.errors.push("Missing 'manifests' object".to_string());
    }
    if doc.get("primary_manifest_id").is_none() {
        findings
            .warnings
            .push("Missing 'primary_manifest_id'".to_string());
    }
}

fn check_types(doc: &Value, findings: &mut Findings) {
    let Some(questions) = questions_of(doc) else {
        return;
    };
    for (qid, q) in questions {
        let missing: Vec<&str> = REQUIRED_QUESTION_FIELDS
            .iter()
            .copied()
            .filter(|field| q.get(*field).is_none())
            .collect();
        if !missing.is_empty() {
            findings.errors.push(format!(
                "{}: Missing required fields: {}",
                qid,
                missing.join(", ")
            ));
        }
        if let Some(qtype) = q.get("type").and_then(Value::as_str) {
            if QuestionType::from_name(qtype).is_none() {
                findings.errors.push(format!(
                    "{}: Invalid type '{}'. Must be one of: {}",
                    qid,
                    qtype,
                    QuestionType::vocabulary()
                ));
            }
        }
        if let Some(schema) = q.get("answer_schema") {
            if !schema.is_object() {
                findings
                    .errors
                    .push(format!("{}: 'answer_schema' must be an object", qid));
            }
        }
    }
}

fn check_references(doc: &Value, findings: &mut Findings) {
    let question_ids = question_id_set(doc);
    let section_ids: HashSet<&str> = sections_of(doc)
        .iter()
        .filter_map(|s| s.get("id").and_then(Value::as_str))
        .collect();

    for section in sections_of(doc) {
        let sid = section.get("id").and_then(Value::as_str).unwrap_or("?");
        for qid in string_items(section.get("question_ids")) {
            if !question_ids.contains(qid) {
                findings.errors.push(format!(
                    "Section {}: References non-existent question '{}'",
                    sid, qid
                ));
            }
        }
    }
    if let Some(questions) = questions_of(doc) {
        for (qid, q) in questions {
            if let Some(sid) = q.get("section_id").and_then(Value::as_str) {
                if !section_ids.contains(sid) {
                    findings.errors.push(format!(
                        "{}: Invalid section_id '{}' (section doesn't exist)",
                        qid, sid
                    ));
                }
            }
        }
    }
}

fn check_manifests(doc: &Value, findings: &mut Findings) {
    let question_ids = question_id_set(doc);
    let Some(manifests) = doc.get("manifests").and_then(Value::as_object) else {
        return;
    };
    for (name, manifest) in manifests {
        for qid in string_items(manifest.get("question_ids")) {
            if !question_ids.contains(qid) {
                findings.errors.push(format!(
                    "Manifest '{}': References non-existent question '{}'",
                    name, qid
                ));
            }
        }
    }
    if let Some(primary) = doc.get("primary_manifest_id").and_then(Value::as_str) {
        if !manifests.contains_key(primary) {
            findings.errors.push(format!(
                "primary_manifest_id '{}' is not a known manifest",
                primary
            ));
        }
    }
}

fn check_options(doc: &Value, findings: &mut Findings) {
    let Some(questions) = questions_of(doc) else {
        return;
    };
    for (qid, q) in questions {
        let qtype = q.get("type").and_then(Value::as_str).unwrap_or("");
        if !matches!(qtype, "single_select" | "multi_select" | "ranked_select") {
            continue;
        }
        match q.get("options").and_then(Value::as_array) {
            None => findings
                .errors
                .push(format!("{}: Select-type question missing options array", qid)),
            Some(opts) if opts.is_empty() => findings
                .errors
                .push(format!("{}: Select-type question missing options array", qid)),
            Some(opts) => {
                if matches!(qtype, "single_select" | "multi_select") {
                    for (i, opt) in opts.iter().enumerate() {
                        if opt.get("value").is_none() {
                            findings
                                .errors
                                .push(format!("{}: Option {} missing 'value'", qid, i));
                        }
                        if opt.get("label").is_none() {
                            findings
                                .errors
                                .push(format!("{}: Option {} missing 'label'", qid, i));
                        }
                    }
                }
            }
        }
    }
}

fn check_fields(doc: &Value, findings: &mut Findings) {
    let Some(questions) = questions_of(doc) else {
        return;
    };
    for (qid, q) in questions {
        if q.get("type").and_then(Value::as_str) != Some("compound") {
            continue;
        }
        let fields = q.get("fields").and_then(Value::as_array);
        let Some(fields) = fields.filter(|f| !f.is_empty()) else {
            findings
                .errors
                .push(format!("{}: Compound question missing 'fields' array", qid));
            continue;
        };
        let schema = q.get("answer_schema").and_then(Value::as_object);
        for field in fields {
            for required in ["key", "type", "label"] {
                if field.get(required).is_none() {
                    findings
                        .errors
                        .push(format!("{}: Compound field missing '{}'", qid, required));
                }
            }
            if let (Some(key), Some(schema)) = (field.get("key").and_then(Value::as_str), schema) {
                if !schema.contains_key(key) {
                    findings.errors.push(format!(
                        "{}: Compound field key '{}' missing from 'answer_schema'",
                        qid, key
                    ));
                }
            }
        }
    }
}

fn check_duplicates(doc: &Value, findings: &mut Findings) {
    let Some(questions) = questions_of(doc) else {
        return;
    };
    // The questions map cannot hold duplicate keys, so duplicates surface
    // through `id` fields diverging from their keys.
    let mut id_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for q in questions.values() {
        if let Some(id) = q.get("id").and_then(Value::as_str) {
            *id_counts.entry(id).or_insert(0) += 1;
        }
    }
    let duplicated: Vec<&str> = id_counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, _)| *id)
        .collect();
    if !duplicated.is_empty() {
        findings.errors.push(format!(
            "Duplicate question IDs found: {}",
            duplicated.join(", ")
        ));
    }

    for section in sections_of(doc) {
        let sid = section.get("id").and_then(Value::as_str).unwrap_or("?");
        let mut orders: BTreeMap<i64, &str> = BTreeMap::new();
        for qid in string_items(section.get("question_ids")) {
            let Some(order) = questions
                .get(qid)
                .and_then(|q| q.get("order"))
                .and_then(Value::as_i64)
            else {
                continue;
            };
            match orders.get(&order) {
                Some(first) => findings.errors.push(format!(
                    "Section {}: Duplicate order {} ({} and {})",
                    sid, order, first, qid
                )),
                None => {
                    orders.insert(order, qid);
                }
            }
        }
    }
}

fn check_orphans(doc: &Value, findings: &mut Findings) {
    let Some(questions) = questions_of(doc) else {
        return;
    };
    let referenced: HashSet<&str> = sections_of(doc)
        .iter()
        .flat_map(|s| string_items(s.get("question_ids")))
        .collect();
    let mut orphans: Vec<&str> = questions
        .keys()
        .map(String::as_str)
        .filter(|qid| !referenced.contains(qid))
        .collect();
    orphans.sort_unstable();
    if !orphans.is_empty() {
        findings.warnings.push(format!(
            "Orphan questions (not in any section): {}",
            orphans.join(", ")
        ));
    }
}

const MULTI_SELECT_SOFT_MAX: usize = 6;

fn check_best_practices(doc: &Value, findings: &mut Findings) {
    let Some(questions) = questions_of(doc) else {
        return;
    };
    for (qid, q) in questions {
        if q.get("type").and_then(Value::as_str) == Some("multi_select") {
            let count = q
                .get("options")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0);
            if count > MULTI_SELECT_SOFT_MAX && q.get("max").is_none() {
                findings.warnings.push(format!(
                    "{}: multi_select has no max limit ({} options). \
                     Consider adding max to prevent analysis paralysis.",
                    qid, count
                ));
            }
        }
        let has_examples = q
            .get("examples")
            .and_then(Value::as_array)
            .map(|e| !e.is_empty())
            .unwrap_or(false);
        if !has_examples {
            findings
                .warnings
                .push(format!("{}: No examples provided", qid));
        }
    }
}

const TYPOGRAPHIC_CHARS: [char; 7] = [
    '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '\u{2013}', '\u{2014}', '\u{2026}',
];

fn check_syntax(doc: &Value, findings: &mut Findings) {
    let count = count_typographic_strings(doc);
    if count > 0 {
        findings.warnings.push(format!(
            "Typographic characters found in {} string value(s)",
            count
        ));
    }
}

fn count_typographic_strings(value: &Value) -> usize {
    match value {
        Value::String(s) => usize::from(s.contains(TYPOGRAPHIC_CHARS)),
        Value::Array(items) => items.iter().map(count_typographic_strings).sum(),
        Value::Object(map) => map.values().map(count_typographic_strings).sum(),
        _ => 0,
    }
}
