use serde::{Deserialize, Serialize};

/// A named, derived subset of questions plus display/timing metadata.
///
/// Manifests are computed, not authored: a question belongs to a manifest
/// exactly when the manifest's name appears in the question's
/// `tags.included_in_manifests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub id: String,

    pub title: String,

    /// Member question ids in global question order, not section grouping
    pub question_ids: Vec<String>,

    pub timebox_minutes: u32,

    /// Suggested wind-down once the timebox elapses
    pub post_timebox_activity: String,
}
