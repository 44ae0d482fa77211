//! Host-agnostic application service for the taskflow agent
//!
//! [`WorkflowService`] bundles the task store, the execution log, and the
//! workflow engine behind one facade, and exposes the operations the HTTP
//! layer (or any other host) consumes: direct task CRUD plus natural-
//! language workflow runs.

pub mod config;
pub mod http;

use std::sync::Arc;

use classifier::{ClassifierBackend, ClassifierConfig, IntentClassifier, OllamaBackend};
use serde_json::Value;
use task_store::{ExecutionLog, Result as StoreResult, Task, TaskPriority, TaskStatus, TaskStore};
use workflow_engine::{WorkflowEngine, WorkflowState};

pub use config::ServiceConfig;

/// The application service: store, log, and engine behind one facade.
pub struct WorkflowService {
    config: ServiceConfig,
    store: Arc<TaskStore>,
    log: Arc<ExecutionLog>,
    engine: WorkflowEngine,
}

impl WorkflowService {
    /// Build a service over the default Ollama backend.
    pub fn new(config: ServiceConfig) -> Self {
        let backend: Arc<dyn ClassifierBackend> =
            Arc::new(OllamaBackend::new(&config.classifier));
        Self::with_backend(config, backend)
    }

    /// Build a service over an explicit backend (tests use stubs here).
    pub fn with_backend(config: ServiceConfig, backend: Arc<dyn ClassifierBackend>) -> Self {
        let store = Arc::new(TaskStore::new(&config.storage_file));
        let log = Arc::new(ExecutionLog::new(&config.logs_file));
        let engine = WorkflowEngine::new(
            IntentClassifier::new(backend),
            Arc::clone(&store),
            Arc::clone(&log),
        );

        Self {
            config,
            store,
            log,
            engine,
        }
    }

    /// The service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The classifier backend in use.
    pub fn classifier_backend(&self) -> &Arc<dyn ClassifierBackend> {
        self.engine.classifier().backend()
    }

    // ─── NATURAL-LANGUAGE WORKFLOW ──────────────────────────────────

    /// Run the full pipeline over a free-text request.
    pub async fn run_workflow(&self, input: &str) -> WorkflowState {
        self.engine.run(input).await
    }

    /// Run the pipeline with a per-request model override.
    ///
    /// Builds a one-off engine over the same store and log, so the run is
    /// recorded exactly as a default-model run would be.
    pub async fn run_workflow_with_model(&self, input: &str, model: &str) -> WorkflowState {
        let config = ClassifierConfig {
            model: model.to_string(),
            ..self.config.classifier.clone()
        };
        let backend: Arc<dyn ClassifierBackend> = Arc::new(OllamaBackend::new(&config));
        let engine = WorkflowEngine::new(
            IntentClassifier::new(backend),
            Arc::clone(&self.store),
            Arc::clone(&self.log),
        );
        engine.run(input).await
    }

    // ─── DIRECT TASK OPERATIONS ─────────────────────────────────────

    /// Create a task directly, bypassing the classifier.
    pub fn create_task(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: TaskPriority,
    ) -> StoreResult<Task> {
        self.store.create(title, description, priority)
    }

    /// Look up a task by id.
    pub fn get_task(&self, id: &str) -> StoreResult<Option<Task>> {
        self.store.get(id)
    }

    /// Apply a shallow change set to a task.
    pub fn update_task(
        &self,
        id: &str,
        changes: serde_json::Map<String, Value>,
    ) -> StoreResult<Task> {
        self.store.update(id, changes)
    }

    /// List tasks, optionally filtered by status, newest first.
    pub fn list_tasks(&self, status: Option<TaskStatus>) -> StoreResult<Vec<Task>> {
        self.store.list(status)
    }

    /// Escalate a task to human review.
    pub fn escalate_task(&self, id: &str, reason: impl Into<String>) -> StoreResult<Task> {
        self.store.escalate(id, reason)
    }

    // ─── DIAGNOSTICS ────────────────────────────────────────────────

    /// Total retained log entries plus the most recent `limit` of them.
    pub fn recent_logs(&self, limit: usize) -> StoreResult<(usize, Vec<Value>)> {
        let all = self.log.all()?;
        let count = all.len();
        let skip = count.saturating_sub(limit);
        Ok((count, all.into_iter().skip(skip).collect()))
    }

    /// Drop both collections and start empty.
    pub fn reset(&self) -> StoreResult<()> {
        self.store.reset()?;
        self.log.clear()
    }
}
