//! Task data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Escalated,
}

impl TaskStatus {
    /// The wire/storage string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Escalated => "escalated",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "escalated" => Ok(TaskStatus::Escalated),
            other => Err(format!("unknown task status '{}'", other)),
        }
    }
}

/// Priority of a task. Defaults to medium when the request does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// The wire/storage string for this priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown task priority '{}'", other)),
        }
    }
}

/// One recorded change applied to a task.
///
/// The `changes` mapping is the delta that was requested, not a before/after
/// diff of the task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the change was applied.
    pub timestamp: DateTime<Utc>,
    /// Field name to new value, exactly as requested.
    pub changes: serde_json::Map<String, serde_json::Value>,
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique `TASK-%04d` identifier, immutable once assigned.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer free-text description.
    pub description: String,
    /// Current priority.
    pub priority: TaskPriority,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time, non-decreasing.
    pub updated_at: DateTime<Utc>,
    /// Append-only change history.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Why the task was escalated, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,
    /// When the task was escalated, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalated_at: Option<DateTime<Utc>>,
    /// Fields a shallow update introduced that the schema does not know.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Escalated,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("IN_PROGRESS".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("urgent".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_task_serializes_with_snake_case_enums() {
        let task = Task {
            id: "TASK-0001".to_string(),
            title: "Test".to_string(),
            description: String::new(),
            priority: TaskPriority::High,
            status: TaskStatus::InProgress,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            history: Vec::new(),
            escalation_reason: None,
            escalated_at: None,
            extra: serde_json::Map::new(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["priority"], "high");
        // Absent optionals must not appear in the document
        assert!(json.get("escalation_reason").is_none());
    }

    #[test]
    fn test_unknown_fields_are_retained() {
        let json = serde_json::json!({
            "id": "TASK-0001",
            "title": "Test",
            "description": "",
            "priority": "low",
            "status": "pending",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
            "history": [],
            "owner": "alice"
        });

        let task: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task.extra.get("owner"), Some(&serde_json::json!("alice")));

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["owner"], "alice");
    }
}
