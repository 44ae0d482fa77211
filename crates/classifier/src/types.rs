//! Classification decision types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The classified purpose of a user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// The user wants a new task.
    Create,
    /// The user wants to change an existing task.
    Update,
    /// The request needs human judgment.
    Escalate,
}

impl Intent {
    /// The wire string for this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Create => "create",
            Intent::Update => "update",
            Intent::Escalate => "escalate",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Intent::Create),
            "update" => Ok(Intent::Update),
            "escalate" => Ok(Intent::Escalate),
            other => Err(format!("unrecognized intent '{}'", other)),
        }
    }
}

/// Task fields the model extracted from the user's text.
///
/// Everything is optional; the model fills in what the request mentions.
/// `priority` and `status` are left as raw strings here — the model's output
/// is untrusted and validation belongs to the store boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A structured decision parsed from the model's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDecision {
    /// What the user wants done.
    pub intent: Intent,
    /// The model's stated reasoning.
    pub reasoning: String,
    /// Fields extracted from the input.
    pub extracted_data: ExtractedFields,
}

/// The classifier's answer for one input.
///
/// Always carries a valid decision. When the backend failed or the reply did
/// not parse, `decision` is a forced escalate and `error` holds the original
/// fault text.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// The decision, forced to escalate on any fault.
    pub decision: IntentDecision,
    /// Which model produced (or failed to produce) the reply.
    pub model: String,
    /// The original fault, when the decision was forced.
    pub error: Option<String>,
}

impl Classification {
    /// Whether this decision was forced by a classifier fault.
    pub fn is_forced(&self) -> bool {
        self.error.is_some()
    }
}
