//! Authoring configuration for the converter: which question ids are
//! short-listed for the lite manifest, and how the derived manifests present
//! themselves. Lives in a `qbank.yaml` next to the input document; defaults
//! cover content sets that have not externalized theirs yet.

use crate::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "qbank.yaml";

/// The two derived manifests every content set carries
pub const LITE: &str = "lite";
pub const FULL: &str = "full";

/// Display/timing metadata for one derived manifest. Membership is never
/// configured here; it comes from question tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMeta {
    pub title: String,
    pub timebox_minutes: u32,
    pub post_timebox_activity: String,
}

/// Editorial inputs the converter needs beyond the text document itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoringConfig {
    /// Manifest name -> display metadata
    pub manifests: BTreeMap<String, ManifestMeta>,

    /// The manifest clients start on
    pub primary_manifest: String,

    /// Question ids included in the lite manifest
    pub lite_question_ids: BTreeSet<String>,
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        let manifests = BTreeMap::from([
            (
                LITE.to_string(),
                ManifestMeta {
                    title: "Lite Check-in".to_string(),
                    timebox_minutes: 30,
                    post_timebox_activity: "Take a break and do something enjoyable.".to_string(),
                },
            ),
            (
                FULL.to_string(),
                ManifestMeta {
                    title: "Full Check-in".to_string(),
                    timebox_minutes: 60,
                    post_timebox_activity: "Rest and reconnect before continuing.".to_string(),
                },
            ),
        ]);

        let lite_question_ids = [
            "q01", "q02", "q03", "q05", "q06", "q07", "q08", "q09", "q10", "q11", "q14", "q16",
            "q19", "q20", "q22", "q24", "q25", "q28", "q29", "q33", "q37", "q39",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            manifests,
            primary_manifest: LITE.to_string(),
            lite_question_ids,
        }
    }
}

impl AuthoringConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Explicit path if given, else a `qbank.yaml` sibling of the input
    /// document, else built-in defaults
    pub fn resolve(explicit: Option<&Path>, input: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match input.parent().map(|dir| dir.join(CONFIG_FILE_NAME)) {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn is_lite(&self, question_id: &str) -> bool {
        self.lite_question_ids.contains(question_id)
    }

    /// Manifest membership tags for one question id
    pub fn manifest_tags(&self, question_id: &str) -> Vec<String> {
        if self.is_lite(question_id) {
            vec![LITE.to_string(), FULL.to_string()]
        } else {
            vec![FULL.to_string()]
        }
    }
}
