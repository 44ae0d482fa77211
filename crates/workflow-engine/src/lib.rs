//! Workflow state machine for intent-routed task automation
//!
//! The pipeline has exactly one topology and no cycles:
//!
//! ```text
//! intent_classifier ──► create_update ──► confirm ──► END
//!                  └──► escalate ───────┘
//! ```
//!
//! One [`WorkflowEngine::run`] call is one complete traversal: classify the
//! input, route on the decision, perform the task mutation or escalate, then
//! confirm and log. Every fault along the way is folded into the run's
//! [`WorkflowState`] — `run` itself never fails, and every run is logged
//! exactly once from the confirm node.

pub mod engine;
pub mod record;
pub mod state;
pub mod trace;

pub use engine::{Route, WorkflowEngine};
pub use record::ExecutionRecord;
pub use state::WorkflowState;
pub use trace::{ClassifierOutput, TraceStep};
