//! Line classification for the question-bank text format.
//!
//! Every raw line is mapped to exactly one [`LineKind`] before block parsing,
//! so the block parser is a plain state machine over tagged variants instead
//! of a pile of inline string probes.

use regex::Regex;

use crate::Result;

/// One source line, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only.
    Blank,
    /// `SECTION s3 — Title`; the bare form (`SECTION s3`) carries no title.
    SectionHeader { id: String, title: Option<String> },
    /// `q07 — Title (type)` block opener.
    QuestionHeader {
        id: String,
        title: String,
        type_token: Option<String>,
    },
    /// Looks like a block opener but the id is not `q` + digits.
    MalformedHeader { text: String },
    /// Implementation-notes or answer-schema boilerplate; ends the block body.
    Terminator,
    /// `Prompt:` with its inline remainder.
    PromptDirective(String),
    OptionsDirective,
    FieldsDirective,
    /// `ShowWhen:` with its inline remainder (may be empty).
    ShowWhenDirective(String),
    ExamplesDirective,
    /// `- ` list entry with the raw indentation depth and trimmed content.
    Dash { indent: usize, content: String },
    /// Anything else; inert to the block parser.
    Other,
}

/// Classifies raw input lines ahead of block parsing.
///
/// Headers only count at column zero. Directives, terminators, and dash
/// entries are recognized at any indentation.
pub struct LineClassifier {
    section_re: Regex,
    question_re: Regex,
    malformed_re: Regex,
    type_re: Regex,
    paren_re: Regex,
}

impl LineClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            section_re: Regex::new(r"^SECTION\s+(s\d+)(?:\s*—\s*(.+))?$")?,
            question_re: Regex::new(r"^(q\d+)\s*(?:—\s*(.*))?$")?,
            malformed_re: Regex::new(r"^q\S*\s*—")?,
            type_re: Regex::new(r"\(([^)]+)\)\s*$")?,
            paren_re: Regex::new(r"\s*\(.*\)")?,
        })
    }

    pub fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        let indent = line.len() - line.trim_start().len();

        if indent == 0 {
            if trimmed.starts_with("SECTION") {
                if let Some(caps) = self.section_re.captures(trimmed) {
                    return LineKind::SectionHeader {
                        id: caps[1].to_string(),
                        title: caps.get(2).map(|m| self.clean_section_title(m.as_str())),
                    };
                }
            }
            if let Some(caps) = self.question_re.captures(trimmed) {
                let (title, type_token) = match caps.get(2) {
                    Some(rest) => self.split_type_token(rest.as_str()),
                    None => ("Unknown".to_string(), None),
                };
                return LineKind::QuestionHeader {
                    id: caps[1].to_string(),
                    title,
                    type_token,
                };
            }
            if self.malformed_re.is_match(trimmed) {
                return LineKind::MalformedHeader {
                    text: trimmed.to_string(),
                };
            }
        }

        let lower = trimmed.to_lowercase();
        if lower.starts_with("prompt:") {
            return LineKind::PromptDirective(rest_after_colon(trimmed));
        }
        if lower.starts_with("options:") {
            return LineKind::OptionsDirective;
        }
        if lower.starts_with("fields:") {
            return LineKind::FieldsDirective;
        }
        if lower.starts_with("showwhen:") {
            return LineKind::ShowWhenDirective(rest_after_colon(trimmed));
        }
        if lower.starts_with("examples:") {
            return LineKind::ExamplesDirective;
        }
        if lower.starts_with("implementation notes") || lower.contains("answer_schema") {
            return LineKind::Terminator;
        }
        if let Some(content) = trimmed.strip_prefix("- ") {
            return LineKind::Dash {
                indent,
                content: content.trim().to_string(),
            };
        }
        LineKind::Other
    }

    /// Section titles drop their trailing annotation, e.g.
    /// `Connection & Intimacy (8 questions)` keeps only the name.
    fn clean_section_title(&self, raw: &str) -> String {
        self.paren_re.replace_all(raw, "").trim().to_string()
    }

    /// Splits `Title (single_select)` into the title and the type token.
    fn split_type_token(&self, raw: &str) -> (String, Option<String>) {
        match self.type_re.captures(raw) {
            Some(caps) => {
                let token = caps[1].to_string();
                let title = self.type_re.replace(raw, "").trim().to_string();
                (title, Some(token))
            }
            None => (raw.trim().to_string(), None),
        }
    }
}

fn rest_after_colon(line: &str) -> String {
    line.splitn(2, ':').nth(1).unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier {
        LineClassifier::new().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(classifier().classify("   "), LineKind::Blank);
    }

    #[test]
    fn test_section_header_with_title() {
        assert_eq!(
            classifier().classify("SECTION s3 — Connection & Intimacy (8 questions)"),
            LineKind::SectionHeader {
                id: "s3".to_string(),
                title: Some("Connection & Intimacy".to_string()),
            }
        );
    }

    #[test]
    fn test_bare_section_header() {
        assert_eq!(
            classifier().classify("SECTION s2"),
            LineKind::SectionHeader {
                id: "s2".to_string(),
                title: None,
            }
        );
    }

    #[test]
    fn test_question_header_with_type() {
        assert_eq!(
            classifier().classify("q01 — Overall, how are we doing? (single_select)"),
            LineKind::QuestionHeader {
                id: "q01".to_string(),
                title: "Overall, how are we doing?".to_string(),
                type_token: Some("single_select".to_string()),
            }
        );
    }

    #[test]
    fn test_question_header_without_type() {
        assert_eq!(
            classifier().classify("q14 — Anything else on your mind?"),
            LineKind::QuestionHeader {
                id: "q14".to_string(),
                title: "Anything else on your mind?".to_string(),
                type_token: None,
            }
        );
    }

    #[test]
    fn test_bare_question_id_titled_unknown() {
        assert_eq!(
            classifier().classify("q17"),
            LineKind::QuestionHeader {
                id: "q17".to_string(),
                title: "Unknown".to_string(),
                type_token: None,
            }
        );
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(
            classifier().classify("qXX — Broken block"),
            LineKind::MalformedHeader {
                text: "qXX — Broken block".to_string(),
            }
        );
    }

    #[test]
    fn test_indented_header_is_inert() {
        assert_eq!(classifier().classify("  q02 — Not a header"), LineKind::Other);
    }

    #[test]
    fn test_directives_are_case_insensitive() {
        let c = classifier();
        assert_eq!(
            c.classify("PROMPT: How connected do you feel?"),
            LineKind::PromptDirective("How connected do you feel?".to_string())
        );
        assert_eq!(c.classify("options:"), LineKind::OptionsDirective);
        assert_eq!(c.classify("Fields:"), LineKind::FieldsDirective);
        assert_eq!(c.classify("Examples:"), LineKind::ExamplesDirective);
        assert_eq!(
            c.classify("ShowWhen: q29 in [yes, unsure]"),
            LineKind::ShowWhenDirective("q29 in [yes, unsure]".to_string())
        );
    }

    #[test]
    fn test_terminator_forms() {
        let c = classifier();
        assert_eq!(c.classify("Implementation notes: stored as JSON"), LineKind::Terminator);
        assert_eq!(c.classify("answer_schema: { text }"), LineKind::Terminator);
        assert_eq!(c.classify("- answer_schema sketch below"), LineKind::Terminator);
    }

    #[test]
    fn test_prompt_mentioning_schema_stays_prompt() {
        assert_eq!(
            classifier().classify("Prompt: describe your answer_schema preference"),
            LineKind::PromptDirective("describe your answer_schema preference".to_string())
        );
    }

    #[test]
    fn test_dash_indent_levels() {
        let c = classifier();
        assert_eq!(
            c.classify("- Yes"),
            LineKind::Dash {
                indent: 0,
                content: "Yes".to_string(),
            }
        );
        assert_eq!(
            c.classify("    - Red"),
            LineKind::Dash {
                indent: 4,
                content: "Red".to_string(),
            }
        );
    }

    #[test]
    fn test_dash_without_space_is_inert() {
        assert_eq!(classifier().classify("-Yes"), LineKind::Other);
    }
}
