//! Logged snapshot of a completed run.

use chrono::{DateTime, Utc};
use classifier::Intent;
use serde::{Deserialize, Serialize};

use crate::state::WorkflowState;
use crate::trace::TraceStep;

/// Immutable snapshot of a completed [`WorkflowState`], as appended to the
/// execution log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Unique id for this run.
    pub execution_id: String,
    /// Server time at which the run was logged.
    pub timestamp: DateTime<Utc>,
    /// The user's free-text request.
    pub input: String,
    /// The classified intent, if classification got that far.
    pub intent: Option<Intent>,
    /// The task this run touched, if any.
    pub task_id: Option<String>,
    /// Human-readable outcome.
    pub result: String,
    /// The full stage-by-stage trace.
    pub trace: Vec<TraceStep>,
    /// The fault that shaped this run, if any.
    pub error: Option<String>,
}

impl ExecutionRecord {
    /// Snapshot the given state with a fresh execution id and timestamp.
    pub fn snapshot(state: &WorkflowState) -> Self {
        Self {
            execution_id: format!("run-{}", uuid::Uuid::new_v4()),
            timestamp: Utc::now(),
            input: state.input.clone(),
            intent: state.intent,
            task_id: state.task_id.clone(),
            result: state.execution_result.clone(),
            trace: state.execution_trace.clone(),
            error: state.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_copies_the_state() {
        let mut state = WorkflowState::new("create a task");
        state.intent = Some(Intent::Create);
        state.task_id = Some("TASK-0001".to_string());
        state.execution_result = "Task created successfully: TASK-0001".to_string();

        let record = ExecutionRecord::snapshot(&state);
        assert_eq!(record.input, "create a task");
        assert_eq!(record.intent, Some(Intent::Create));
        assert_eq!(record.task_id.as_deref(), Some("TASK-0001"));
        assert!(record.execution_id.starts_with("run-"));
        assert!(record.error.is_none());
    }

    #[test]
    fn test_snapshot_ids_are_unique() {
        let state = WorkflowState::new("x");
        let a = ExecutionRecord::snapshot(&state);
        let b = ExecutionRecord::snapshot(&state);
        assert_ne!(a.execution_id, b.execution_id);
    }
}
