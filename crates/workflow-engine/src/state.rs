//! Per-run workflow state.

use classifier::{ExtractedFields, Intent};
use serde::{Deserialize, Serialize};

use crate::trace::TraceStep;

/// The mutable record threaded through one pipeline run.
///
/// Created zero-valued by the orchestrator, mutated in place by each stage,
/// and handed back to the caller (and the execution log) when the run ends.
/// Not persisted as an entity in its own right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    /// The user's free-text request.
    pub input: String,
    /// The task this run created, updated, or escalated, once known.
    pub task_id: Option<String>,
    /// The classified intent.
    pub intent: Option<Intent>,
    /// Fields the classifier extracted from the input.
    pub task_data: Option<ExtractedFields>,
    /// The classifier's stated reasoning.
    pub decision_reasoning: String,
    /// Human-readable outcome of the run.
    pub execution_result: String,
    /// One audit record per pipeline stage, in execution order.
    pub execution_trace: Vec<TraceStep>,
    /// Whether the request was routed to human handling.
    pub requires_human: bool,
    /// The fault that shaped this run, if any.
    pub error: Option<String>,
}

impl WorkflowState {
    /// The zero-valued initial state for a run over the given input.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            task_id: None,
            intent: None,
            task_data: None,
            decision_reasoning: String::new(),
            execution_result: String::new(),
            execution_trace: Vec::new(),
            requires_human: false,
            error: None,
        }
    }

    /// Whether the run completed without a recorded fault.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_zero_valued() {
        let state = WorkflowState::new("do something");
        assert_eq!(state.input, "do something");
        assert!(state.task_id.is_none());
        assert!(state.intent.is_none());
        assert!(state.task_data.is_none());
        assert_eq!(state.decision_reasoning, "");
        assert_eq!(state.execution_result, "");
        assert!(state.execution_trace.is_empty());
        assert!(!state.requires_human);
        assert!(state.error.is_none());
        assert!(state.succeeded());
    }
}
