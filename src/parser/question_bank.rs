//! Block parser turning semi-structured question-bank text into sections
//! and questions.
//!
//! Parsing is deliberately lenient: malformed blocks are skipped and
//! reported as warnings, never as hard errors. Strictness lives in the
//! validator, not here.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use crate::config::AuthoringConfig;
use crate::models::{
    AnswerOption, AnswerSlot, Field, FieldType, Question, QuestionType, Section, ShowWhen, Tags,
};
use crate::parser::line::{LineClassifier, LineKind};
use crate::parser::slug::{clean_key, clean_value, reserve_key};
use crate::Result;

/// Everything recovered from one bank file: sections and questions in
/// authored order, plus parse warnings.
#[derive(Debug)]
pub struct ParsedBank {
    pub sections: Vec<Section>,
    pub questions: Vec<Question>,
    pub warnings: Vec<String>,
}

/// Active list context inside a question block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    Options,
    Fields,
    ShowWhen,
    Examples,
}

#[derive(Debug)]
struct FieldDraft {
    key: String,
    label: String,
    field_type: FieldType,
    options: Vec<AnswerOption>,
}

impl FieldDraft {
    fn finish(self) -> Field {
        Field {
            key: self.key,
            label: self.label,
            field_type: self.field_type,
            options: none_if_empty(self.options),
        }
    }
}

/// A question block under construction.
#[derive(Debug)]
struct QuestionDraft {
    id: String,
    order: u32,
    title: String,
    question_type: QuestionType,
    section_id: String,
    prompt: String,
    options: Vec<AnswerOption>,
    fields: Vec<Field>,
    current_field: Option<FieldDraft>,
    field_keys: HashSet<String>,
    show_when: Option<ShowWhen>,
    examples: Vec<String>,
    mode: Mode,
    terminated: bool,
}

impl QuestionDraft {
    fn new(
        id: String,
        order: u32,
        title: String,
        question_type: QuestionType,
        section_id: String,
    ) -> Self {
        Self {
            id,
            order,
            title,
            question_type,
            section_id,
            prompt: String::new(),
            options: Vec::new(),
            fields: Vec::new(),
            current_field: None,
            field_keys: HashSet::new(),
            show_when: None,
            examples: Vec::new(),
            mode: Mode::Idle,
            terminated: false,
        }
    }

    /// Starts a new compound field, sealing the previous one.
    fn push_field(&mut self, field: FieldDraft) {
        if let Some(done) = self.current_field.take() {
            self.fields.push(done.finish());
        }
        self.current_field = Some(field);
    }
}

/// Mutable parse state threaded through the whole input.
struct ParseState<'a> {
    config: &'a AuthoringConfig,
    current_section_id: String,
    sections: Vec<Section>,
    section_ids: HashSet<String>,
    questions: Vec<Question>,
    question_ids: HashSet<String>,
    draft: Option<QuestionDraft>,
    skipping: bool,
    warnings: Vec<String>,
}

impl<'a> ParseState<'a> {
    fn new(config: &'a AuthoringConfig) -> Self {
        Self {
            config,
            current_section_id: "s1".to_string(),
            sections: Vec::new(),
            section_ids: HashSet::new(),
            questions: Vec::new(),
            question_ids: HashSet::new(),
            draft: None,
            skipping: false,
            warnings: Vec::new(),
        }
    }

    /// A titled header records a section; the bare form only moves the
    /// pointer that subsequent questions bind to.
    fn open_section(&mut self, id: String, title: Option<String>) {
        self.finish_draft();
        self.skipping = false;
        match title {
            Some(title) => {
                let final_id = reserve_key(&id, &mut self.section_ids);
                if final_id != id {
                    self.warnings
                        .push(format!("Duplicate section id '{}' renamed to '{}'", id, final_id));
                }
                self.sections.push(Section::new(final_id.clone(), title));
                self.current_section_id = final_id;
            }
            None => self.current_section_id = id,
        }
    }

    fn open_question(&mut self, id: String, title: String, type_token: Option<&str>) {
        self.finish_draft();
        self.skipping = false;
        // Ordering comes from the authored digits even when the id itself
        // gets renamed for uniqueness.
        let order = id[1..].parse().unwrap_or(0);
        let final_id = reserve_key(&id, &mut self.question_ids);
        if final_id != id {
            self.warnings
                .push(format!("Duplicate question id '{}' renamed to '{}'", id, final_id));
        }
        self.draft = Some(QuestionDraft::new(
            final_id,
            order,
            title,
            question_type_from(type_token),
            self.current_section_id.clone(),
        ));
    }

    fn skip_block(&mut self, header: &str) {
        self.finish_draft();
        self.warnings
            .push(format!("Skipping block with unrecognized header: '{}'", header));
        self.skipping = true;
    }

    fn finish_draft(&mut self) {
        let Some(mut draft) = self.draft.take() else {
            return;
        };
        if let Some(field) = draft.current_field.take() {
            draft.fields.push(field.finish());
        }
        let answer_schema = answer_schema_for(draft.question_type, &draft.fields);
        let tags = Tags {
            included_in_manifests: self.config.manifest_tags(&draft.id),
        };
        self.questions.push(Question {
            id: draft.id,
            section_id: draft.section_id,
            order: draft.order,
            title: draft.title,
            prompt: draft.prompt,
            question_type: draft.question_type,
            answer_schema,
            tags,
            options: none_if_empty(draft.options),
            fields: none_if_empty(draft.fields),
            show_when: draft.show_when,
            examples: none_if_empty(draft.examples),
        });
    }

    fn into_bank(mut self) -> ParsedBank {
        self.finish_draft();
        ParsedBank {
            sections: self.sections,
            questions: self.questions,
            warnings: self.warnings,
        }
    }
}

/// Parses question-bank text files.
pub struct BankParser {
    classifier: LineClassifier,
    show_when_re: Regex,
    labelless_field_re: Regex,
    labeled_field_re: Regex,
}

impl BankParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            classifier: LineClassifier::new()?,
            show_when_re: Regex::new(r"^(\S+)\s+in\s*\[(.*)\]$")?,
            labelless_field_re: Regex::new(r"^\(([^)]+)\):(.*)$")?,
            labeled_field_re: Regex::new(r"^(.+?)(?: \((.+?)\))?(:.*)?$")?,
        })
    }

    pub fn parse(&self, text: &str, config: &AuthoringConfig) -> ParsedBank {
        let mut state = ParseState::new(config);
        for raw in text.lines() {
            self.step(&mut state, self.classifier.classify(raw));
        }
        state.into_bank()
    }

    fn step(&self, state: &mut ParseState, kind: LineKind) {
        match kind {
            LineKind::Blank => {}
            LineKind::SectionHeader { id, title } => state.open_section(id, title),
            LineKind::QuestionHeader {
                id,
                title,
                type_token,
            } => state.open_question(id, title, type_token.as_deref()),
            LineKind::MalformedHeader { text } => state.skip_block(&text),
            _ if state.skipping => {}
            kind => self.body_line(state, kind),
        }
    }

    fn body_line(&self, state: &mut ParseState, kind: LineKind) {
        let ParseState {
            draft, warnings, ..
        } = state;
        let Some(draft) = draft.as_mut() else {
            return;
        };
        if matches!(kind, LineKind::Terminator) {
            draft.terminated = true;
            return;
        }
        if draft.terminated {
            return;
        }
        match kind {
            LineKind::PromptDirective(prompt) => draft.prompt = prompt,
            LineKind::OptionsDirective => draft.mode = Mode::Options,
            LineKind::FieldsDirective => draft.mode = Mode::Fields,
            LineKind::ExamplesDirective => draft.mode = Mode::Examples,
            LineKind::ShowWhenDirective(rule) => {
                draft.mode = Mode::ShowWhen;
                if !rule.is_empty() {
                    self.apply_show_when(draft, &rule, warnings);
                }
            }
            LineKind::Dash { indent, content } => {
                self.dash_line(draft, indent, &content, warnings)
            }
            _ => {}
        }
    }

    fn dash_line(
        &self,
        draft: &mut QuestionDraft,
        indent: usize,
        content: &str,
        warnings: &mut Vec<String>,
    ) {
        match draft.mode {
            Mode::Idle => {}
            Mode::Options => draft
                .options
                .push(AnswerOption::new(clean_value(content), content)),
            Mode::Examples => draft.examples.push(content.to_string()),
            Mode::ShowWhen => self.apply_show_when(draft, content, warnings),
            Mode::Fields => self.field_line(draft, indent, content),
        }
    }

    /// Field lists have two levels: a field per top-level dash, options for
    /// the current field per dash indented by two or more spaces. A single
    /// space of indentation matches neither level and is dropped.
    fn field_line(&self, draft: &mut QuestionDraft, indent: usize, content: &str) {
        if indent >= 2 {
            if let Some(field) = draft.current_field.as_mut() {
                field
                    .options
                    .push(AnswerOption::new(clean_value(content), content));
            }
            return;
        }
        if indent != 0 {
            return;
        }

        // `- (single_select): Low, Medium, High` has no label of its own.
        if let Some(caps) = self.labelless_field_re.captures(content) {
            let field_type = field_type_from(&caps[1]);
            let key = reserve_key("choice", &mut draft.field_keys);
            draft.push_field(FieldDraft {
                key,
                label: "Options".to_string(),
                field_type,
                options: split_inline_options(&caps[2]),
            });
            return;
        }

        let Some(caps) = self.labeled_field_re.captures(content) else {
            return;
        };
        let label_raw = caps[1].trim().to_string();
        let guard = label_raw.to_lowercase();
        if guard.starts_with("implementation notes") || guard.starts_with("answer_schema") {
            return;
        }

        let mut field_type = caps
            .get(2)
            .map(|m| field_type_from(m.as_str()))
            .unwrap_or(FieldType::ShortText);
        let is_notes = label_raw
            .split_whitespace()
            .any(|word| word.to_lowercase() == "notes");
        let (base_key, label) = if is_notes {
            field_type = FieldType::FreeText;
            let label = if content.to_lowercase().contains("optional") {
                "Notes".to_string()
            } else {
                label_raw
            };
            ("notes".to_string(), label)
        } else {
            let base = clean_key(&label_raw);
            let base = if base.is_empty() {
                "field".to_string()
            } else {
                base
            };
            (base, label_raw)
        };
        let key = reserve_key(&base_key, &mut draft.field_keys);

        let mut options = Vec::new();
        if matches!(field_type, FieldType::SingleSelect | FieldType::MultiSelect) {
            if let Some(rest) = caps.get(3) {
                options = split_inline_options(rest.as_str().trim_start_matches(':'));
            }
        }
        draft.push_field(FieldDraft {
            key,
            label,
            field_type,
            options,
        });
    }

    fn apply_show_when(
        &self,
        draft: &mut QuestionDraft,
        rule: &str,
        warnings: &mut Vec<String>,
    ) {
        match self.show_when_re.captures(rule.trim()) {
            Some(caps) => {
                let values = caps[2]
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .collect();
                draft.show_when = Some(ShowWhen {
                    field: caps[1].to_string(),
                    values,
                });
            }
            None => warnings.push(format!(
                "{}: unrecognized showWhen rule '{}'",
                draft.id, rule
            )),
        }
    }
}

/// Empty-answer shape for a question: fully determined by the type, and for
/// compound questions by the declared fields.
pub fn answer_schema_for(
    question_type: QuestionType,
    fields: &[Field],
) -> BTreeMap<String, AnswerSlot> {
    let mut schema = BTreeMap::new();
    match question_type {
        QuestionType::FreeText => {
            schema.insert("text".to_string(), AnswerSlot::empty_text());
        }
        QuestionType::SingleSelect => {
            schema.insert("selected_value".to_string(), AnswerSlot::empty_text());
            schema.insert("other_text".to_string(), AnswerSlot::empty_text());
            schema.insert("notes".to_string(), AnswerSlot::empty_text());
        }
        QuestionType::MultiSelect => {
            schema.insert("selected_values".to_string(), AnswerSlot::empty_list());
            schema.insert("other_text".to_string(), AnswerSlot::empty_text());
            schema.insert("notes".to_string(), AnswerSlot::empty_text());
        }
        QuestionType::Compound => {
            for field in fields {
                let slot = if field.field_type.is_list_valued() {
                    AnswerSlot::empty_list()
                } else {
                    AnswerSlot::empty_text()
                };
                schema.insert(field.key.clone(), slot);
            }
        }
        // Standalone ranked selects are authored as compound blocks.
        QuestionType::RankedSelect => {}
    }
    schema
}

fn question_type_from(token: Option<&str>) -> QuestionType {
    let Some(token) = token else {
        return QuestionType::FreeText;
    };
    let lower = token.to_lowercase();
    if lower.contains("compound") {
        QuestionType::Compound
    } else if lower.contains("single_select") {
        QuestionType::SingleSelect
    } else if lower.contains("multi_select") {
        QuestionType::MultiSelect
    } else if lower.contains("ranked_select") {
        QuestionType::Compound
    } else {
        QuestionType::FreeText
    }
}

fn field_type_from(token: &str) -> FieldType {
    let lower = token.to_lowercase();
    if lower.contains("single_select") {
        FieldType::SingleSelect
    } else if lower.contains("multi_select") {
        FieldType::MultiSelect
    } else if lower.contains("ranked_select") {
        FieldType::RankedSelect
    } else if lower.contains("number") {
        FieldType::Number
    } else if lower.contains("free_text") {
        FieldType::FreeText
    } else {
        FieldType::ShortText
    }
}

fn split_inline_options(raw: &str) -> Vec<AnswerOption> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| AnswerOption::new(clean_value(part), part))
        .collect()
}

fn none_if_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
