// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A column of a board, as handed over by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub title: String,
}

/// A board and its ordered columns. Only titles matter for routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// A command understood well enough to create a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskIntent {
    /// Never empty and never ends with a period.
    pub title: String,
    pub board_id: String,
    /// `None` only when the routed board has no columns.
    pub column_id: Option<String>,
    pub description: String,
    pub comment: String,
}

/// Returned instead of a task when the utterance could not be split into a
/// title and a comment with confidence. The UI should ask the user to repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnclearIntent {
    pub error: String,
    pub needs_repetition: bool,
    pub original_text: String,
}

impl UnclearIntent {
    pub const ERROR_CODE: &'static str = "unclear";

    pub fn new(original_text: impl Into<String>) -> Self {
        Self {
            error: Self::ERROR_CODE.to_string(),
            needs_repetition: true,
            original_text: original_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParseOutcome {
    Unclear(UnclearIntent),
    Task(TaskIntent),
}

impl ParseOutcome {
    pub fn task(&self) -> Option<&TaskIntent> {
        match self {
            ParseOutcome::Task(task) => Some(task),
            ParseOutcome::Unclear(_) => None,
        }
    }

    pub fn needs_repetition(&self) -> bool {
        matches!(self, ParseOutcome::Unclear(_))
    }
}
