//! The four-node pipeline and its orchestrator.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use classifier::{Intent, IntentClassifier};
use task_store::{ExecutionLog, TaskPriority, TaskStore};

use crate::record::ExecutionRecord;
use crate::state::WorkflowState;
use crate::trace::{ClassifierOutput, TraceStep};

/// Title used when a create request does not name one.
const DEFAULT_TITLE: &str = "Untitled Task";

/// Which branch a run takes after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Perform the requested task mutation.
    CreateUpdate,
    /// Hand the request to a human.
    Escalate,
}

/// Drives the fixed pipeline over its collaborators.
///
/// `run` is total: every fault a stage encounters is converted into
/// `state.error` plus a human-readable `execution_result`, so the returned
/// state is always well-formed and always logged exactly once.
pub struct WorkflowEngine {
    classifier: IntentClassifier,
    store: Arc<TaskStore>,
    log: Arc<ExecutionLog>,
}

impl WorkflowEngine {
    /// Create an engine over the given collaborators.
    pub fn new(
        classifier: IntentClassifier,
        store: Arc<TaskStore>,
        log: Arc<ExecutionLog>,
    ) -> Self {
        Self {
            classifier,
            store,
            log,
        }
    }

    /// The task store this engine mutates.
    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    /// The execution log this engine appends to.
    pub fn log(&self) -> &Arc<ExecutionLog> {
        &self.log
    }

    /// The classifier this engine consults.
    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Run one complete pipeline traversal over the given input.
    pub async fn run(&self, input: impl Into<String>) -> WorkflowState {
        let mut state = WorkflowState::new(input);

        self.classify_intent(&mut state).await;
        match self.route_decision(&mut state) {
            Route::CreateUpdate => self.create_update(&mut state),
            Route::Escalate => self.escalate_to_human(&mut state),
        }
        self.confirm_and_log(&mut state);

        state
    }

    /// Entry node: consult the classifier and populate the decision fields.
    async fn classify_intent(&self, state: &mut WorkflowState) {
        let classification = self.classifier.classify(&state.input).await;
        let timestamp = Utc::now();
        let model = classification.model;

        state.intent = Some(classification.decision.intent);
        state.decision_reasoning = classification.decision.reasoning.clone();

        if let Some(error) = classification.error {
            // Forced escalate: the fault is recorded, task_data stays unset.
            state.error = Some(error.clone());
            state.execution_trace.push(TraceStep::IntentClassifier {
                timestamp,
                model,
                output: None,
                error: Some(error),
            });
        } else {
            state.task_data = Some(classification.decision.extracted_data);
            state.execution_trace.push(TraceStep::IntentClassifier {
                timestamp,
                model,
                output: Some(ClassifierOutput {
                    intent: classification.decision.intent,
                    reasoning: classification.decision.reasoning,
                }),
                error: None,
            });
        }
    }

    /// Routing: a deterministic function of the current state.
    fn route_decision(&self, state: &mut WorkflowState) -> Route {
        let decision = if state.intent == Some(Intent::Escalate) || state.error.is_some() {
            Route::Escalate
        } else {
            Route::CreateUpdate
        };

        state.execution_trace.push(TraceStep::RouteDecision {
            timestamp: Utc::now(),
            decision,
        });
        decision
    }

    /// Mutation node: create a new task or update an existing one.
    fn create_update(&self, state: &mut WorkflowState) {
        let timestamp = Utc::now();
        let data = state.task_data.clone().unwrap_or_default();

        match state.intent {
            Some(Intent::Create) => {
                let title = data.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
                let description = data.description.unwrap_or_default();
                let priority = data
                    .priority
                    .as_deref()
                    .map(|raw| {
                        TaskPriority::from_str(raw).unwrap_or_else(|e| {
                            log::warn!("{}; defaulting to {}", e, TaskPriority::default());
                            TaskPriority::default()
                        })
                    })
                    .unwrap_or_default();

                match self.store.create(title, description, priority) {
                    Ok(task) => {
                        state.task_id = Some(task.id.clone());
                        state.execution_result =
                            format!("Task created successfully: {}", task.id);
                        state.execution_trace.push(TraceStep::CreateUpdateTask {
                            timestamp,
                            action: Some(Intent::Create),
                            task_id: Some(task.id),
                            updates: None,
                            error: None,
                        });
                    }
                    Err(e) => self.fail_mutation(state, timestamp, e.to_string()),
                }
            }
            Some(Intent::Update) => {
                let Some(task_id) = data.task_id else {
                    state.error = Some("No task ID provided for update".to_string());
                    state.execution_result = "Update failed: no task ID specified".to_string();
                    state.execution_trace.push(TraceStep::CreateUpdateTask {
                        timestamp,
                        action: Some(Intent::Update),
                        task_id: None,
                        updates: None,
                        error: Some("No task ID".to_string()),
                    });
                    return;
                };

                let mut changes = serde_json::Map::new();
                if let Some(status) = data.status {
                    changes.insert("status".to_string(), Value::String(status));
                }
                if let Some(priority) = data.priority {
                    changes.insert("priority".to_string(), Value::String(priority));
                }
                if let Some(description) = data.description {
                    changes.insert("description".to_string(), Value::String(description));
                }

                match self.store.update(&task_id, changes.clone()) {
                    Ok(task) => {
                        state.task_id = Some(task.id.clone());
                        state.execution_result =
                            format!("Task updated successfully: {}", task.id);
                        state.execution_trace.push(TraceStep::CreateUpdateTask {
                            timestamp,
                            action: Some(Intent::Update),
                            task_id: Some(task.id),
                            updates: Some(changes),
                            error: None,
                        });
                    }
                    Err(e) if e.is_not_found() => {
                        state.error = Some(format!("Task {} not found", task_id));
                        state.execution_result = format!("Task {} not found", task_id);
                        state.execution_trace.push(TraceStep::CreateUpdateTask {
                            timestamp,
                            action: Some(Intent::Update),
                            task_id: Some(task_id),
                            updates: Some(changes),
                            error: Some("Task not found".to_string()),
                        });
                    }
                    Err(e) => self.fail_mutation(state, timestamp, e.to_string()),
                }
            }
            _ => {
                // Routing only sends create and update intents here.
                self.fail_mutation(
                    state,
                    timestamp,
                    "No actionable intent for task mutation".to_string(),
                );
            }
        }
    }

    /// Convert an unexpected mutation fault into state, never past the node.
    fn fail_mutation(
        &self,
        state: &mut WorkflowState,
        timestamp: chrono::DateTime<Utc>,
        error: String,
    ) {
        log::warn!("Task mutation failed: {}", error);
        state.error = Some(error.clone());
        state.execution_result = format!("Error: {}", error);
        state.execution_trace.push(TraceStep::CreateUpdateTask {
            timestamp,
            action: None,
            task_id: None,
            updates: None,
            error: Some(error),
        });
    }

    /// Escalation node: flag the run for human review.
    fn escalate_to_human(&self, state: &mut WorkflowState) {
        state.requires_human = true;

        let reason = if state.decision_reasoning.is_empty() {
            "Complex request".to_string()
        } else {
            state.decision_reasoning.clone()
        };

        if let Some(task_id) = state.task_id.clone() {
            if let Err(e) = self.store.escalate(&task_id, reason.as_str()) {
                log::warn!("Could not mark task {} escalated: {}", task_id, e);
                state.error.get_or_insert_with(|| e.to_string());
            }
            state.execution_result = format!("Task {} escalated to human review", task_id);
        } else {
            state.execution_result = "Request escalated to human review".to_string();
        }

        state.execution_trace.push(TraceStep::EscalateToHuman {
            timestamp: Utc::now(),
            reason,
        });
    }

    /// Terminal node: record the final message and log the run.
    ///
    /// This is the single point where every run, whatever its outcome, is
    /// durably logged. An audit-write failure is reported but does not fail
    /// the run.
    fn confirm_and_log(&self, state: &mut WorkflowState) {
        state.execution_trace.push(TraceStep::ConfirmAndLog {
            timestamp: Utc::now(),
            final_result: state.execution_result.clone(),
        });

        let record = ExecutionRecord::snapshot(state);
        match serde_json::to_value(&record) {
            Ok(entry) => {
                if let Err(e) = self.log.append(entry) {
                    log::error!("Failed to append execution log entry: {}", e);
                }
            }
            Err(e) => log::error!("Failed to serialize execution record: {}", e),
        }
    }
}
