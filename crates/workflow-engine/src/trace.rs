//! Execution trace steps.
//!
//! Each pipeline stage appends exactly one step to the run's trace. Steps
//! are a tagged variant per stage rather than open maps, with a catch-all so
//! entries written by a newer build still deserialize.

use chrono::{DateTime, Utc};
use classifier::Intent;
use serde::{Deserialize, Serialize};

use crate::engine::Route;

/// Summary of a successful classification, recorded in the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub intent: Intent,
    pub reasoning: String,
}

/// One audit record appended by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    /// The classifier stage: which model ran and what came back.
    IntentClassifier {
        timestamp: DateTime<Utc>,
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output: Option<ClassifierOutput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// The routing decision taken after classification.
    RouteDecision {
        timestamp: DateTime<Utc>,
        decision: Route,
    },
    /// The task mutation stage: what was done to which task.
    CreateUpdateTask {
        timestamp: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<Intent>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        updates: Option<serde_json::Map<String, serde_json::Value>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// The escalation stage and its reason.
    EscalateToHuman {
        timestamp: DateTime<Utc>,
        reason: String,
    },
    /// The terminal stage, carrying the run's final message.
    ConfirmAndLog {
        timestamp: DateTime<Utc>,
        final_result: String,
    },
    /// A step kind this build does not know.
    #[serde(other)]
    Unknown,
}

impl TraceStep {
    /// The stage name this step was recorded by.
    pub fn step_name(&self) -> &'static str {
        match self {
            TraceStep::IntentClassifier { .. } => "intent_classifier",
            TraceStep::RouteDecision { .. } => "route_decision",
            TraceStep::CreateUpdateTask { .. } => "create_update_task",
            TraceStep::EscalateToHuman { .. } => "escalate_to_human",
            TraceStep::ConfirmAndLog { .. } => "confirm_and_log",
            TraceStep::Unknown => "unknown",
        }
    }
}
