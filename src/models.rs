use serde::{Deserialize, Serialize};

/// A persisted task record. `id` is assigned by the backend on creation and
/// is immutable afterwards; a draft being created carries an empty `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// An in-progress title+description pair held in form state, not yet
/// validated or submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}
