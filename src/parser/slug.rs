//! Slug derivation for option values and field keys.

use std::collections::HashSet;

const MAX_SLUG_LEN: usize = 30;

fn strip_non_slug_chars(value: &mut String) {
    value.retain(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
}

/// Derive a field key from its label: first four words joined with
/// underscores, lower-cased, stripped to `[a-z0-9_]`, prefixed when it would
/// start with a digit, capped at 30 characters.
pub fn clean_key(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(4).collect();
    let mut key = words.join("_").to_lowercase();
    strip_non_slug_chars(&mut key);
    if key.starts_with(|c: char| c.is_ascii_digit()) {
        key.insert_str(0, "f_");
    }
    key.truncate(MAX_SLUG_LEN);
    key
}

/// Derive an option value from its label.
///
/// Special cases: a label mentioning "other (write in)" collapses to the
/// literal `other`, and a leading `token:` word wins as-is (lower-cased,
/// colon removed). Otherwise the first three words are normalized the same
/// way as keys.
pub fn clean_value(text: &str) -> String {
    if text.to_lowercase().contains("other (write in)") {
        return "other".to_string();
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.first() {
        Some(first) if first.contains(':') => first.replace(':', "").to_lowercase(),
        Some(_) => {
            let mut value = words[..words.len().min(3)].join("_").to_lowercase();
            strip_non_slug_chars(&mut value);
            value.truncate(MAX_SLUG_LEN);
            value
        }
        None => String::new(),
    }
}

/// Resolve a slug collision by numeric suffixing (`base`, `base_2`,
/// `base_3`, ...) and record the winner in `taken`.
pub fn reserve_key(base: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }
    let mut counter = 2u32;
    loop {
        let candidate = format!("{}_{}", base, counter);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_key_takes_first_four_words() {
        assert_eq!(
            clean_key("What went well for us this week"),
            "what_went_well_for"
        );
    }

    #[test]
    fn test_clean_key_strips_punctuation() {
        assert_eq!(clean_key("Energy level (1-10)?"), "energy_level_110");
    }

    #[test]
    fn test_clean_key_prefixes_leading_digit() {
        assert_eq!(clean_key("3 things I appreciated"), "f_3_things_i_appreciated");
    }

    #[test]
    fn test_clean_key_caps_length() {
        let key = clean_key("extraordinarily verbose labelling conventions everywhere");
        assert!(key.len() <= 30);
        assert_eq!(key, "extraordinarily_verbose_labell");
    }

    #[test]
    fn test_clean_key_empty() {
        assert_eq!(clean_key("   "), "");
    }

    #[test]
    fn test_clean_value_other_write_in() {
        assert_eq!(clean_value("Other (write in) - tell us more"), "other");
        assert_eq!(clean_value("OTHER (WRITE IN)"), "other");
    }

    #[test]
    fn test_clean_value_leading_token() {
        assert_eq!(clean_value("10: fully ready"), "10");
        assert_eq!(clean_value("Yes: absolutely"), "yes");
    }

    #[test]
    fn test_clean_value_first_three_words() {
        assert_eq!(clean_value("Quality time together lately"), "quality_time_together");
        assert_eq!(clean_value("Yes"), "yes");
    }

    #[test]
    fn test_reserve_key_suffixes_collisions() {
        let mut taken = HashSet::new();
        assert_eq!(reserve_key("notes", &mut taken), "notes");
        assert_eq!(reserve_key("notes", &mut taken), "notes_2");
        assert_eq!(reserve_key("notes", &mut taken), "notes_3");
    }
}
