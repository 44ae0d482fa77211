//! HTTP surface.
//!
//! A thin axum wrapper over [`WorkflowService`]: one webhook pair for
//! natural-language requests, a direct task API that bypasses the
//! classifier, and diagnostics (logs, health, reset).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use classifier::Intent;
use task_store::{StoreError, Task, TaskPriority, TaskStatus};
use workflow_engine::{TraceStep, WorkflowState};

use crate::WorkflowService;

/// Shared handler state.
pub type AppState = Arc<WorkflowService>;

/// Build the complete router.
pub fn router(service: AppState) -> Router {
    Router::new()
        .route("/webhook/task", post(webhook_task))
        .route("/webhook/task/async", post(webhook_task_async))
        .route("/api/tasks", post(create_task).get(list_tasks))
        .route("/api/tasks/:id", get(get_task).put(update_task))
        .route("/api/tasks/:id/escalate", post(escalate_task))
        .route("/logs", get(get_logs))
        .route("/health", get(health))
        .route("/reset", delete(reset))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

// ─── ERROR MAPPING ──────────────────────────────────────────────────

/// An error a handler returns to the client.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidChange(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

// ─── REQUEST / RESPONSE MODELS ──────────────────────────────────────

/// Natural-language workflow request.
#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    /// The user's free-text request.
    pub input: String,
    /// Callback URL for async processing.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Per-request model override.
    #[serde(default)]
    pub model: Option<String>,
}

/// Workflow run outcome as returned to webhook callers.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub task_id: Option<String>,
    pub intent: Option<Intent>,
    pub result: String,
    pub reasoning: String,
    pub requires_human: bool,
    pub execution_trace: Vec<TraceStep>,
    pub timestamp: DateTime<Utc>,
}

impl From<WorkflowState> for TaskResponse {
    fn from(state: WorkflowState) -> Self {
        Self {
            success: state.error.is_none(),
            task_id: state.task_id,
            intent: state.intent,
            result: state.execution_result,
            reasoning: state.decision_reasoning,
            requires_human: state.requires_human,
            execution_trace: state.execution_trace,
            timestamp: Utc::now(),
        }
    }
}

/// Direct task creation body.
#[derive(Debug, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Direct task update body. All fields optional; at least one required.
#[derive(Debug, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Payload POSTed to the callback URL after an async run.
#[derive(Debug, Serialize)]
struct WebhookPayload {
    task_id: Option<String>,
    result: String,
    status: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EscalateParams {
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogParams {
    #[serde(default)]
    limit: Option<usize>,
}

// ─── WEBHOOK HANDLERS ───────────────────────────────────────────────

async fn webhook_task(
    State(service): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> Json<TaskResponse> {
    let state = run(&service, &request.input, request.model.as_deref()).await;
    Json(TaskResponse::from(state))
}

async fn webhook_task_async(
    State(service): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(webhook_url) = request.webhook_url.clone() else {
        return Err(ApiError::bad_request(
            "webhook_url required for async processing",
        ));
    };
    let callback_url = webhook_url.clone();

    tokio::spawn(async move {
        let state = run(&service, &request.input, request.model.as_deref()).await;
        deliver_callback(&webhook_url, state).await;
    });

    Ok(Json(json!({
        "status": "processing",
        "message": "Task queued for processing",
        "callback_url": callback_url,
    })))
}

async fn run(service: &WorkflowService, input: &str, model: Option<&str>) -> WorkflowState {
    match model {
        Some(model) => service.run_workflow_with_model(input, model).await,
        None => service.run_workflow(input).await,
    }
}

async fn deliver_callback(webhook_url: &str, state: WorkflowState) {
    let payload = WebhookPayload {
        task_id: state.task_id.clone(),
        status: if state.error.is_none() {
            "success".to_string()
        } else {
            "error".to_string()
        },
        result: state.execution_result.clone(),
        timestamp: Utc::now(),
    };

    let client = reqwest::Client::new();
    if let Err(e) = client.post(webhook_url).json(&payload).send().await {
        log::warn!("Callback delivery to {} failed: {}", webhook_url, e);
    }
}

// ─── DIRECT TASK HANDLERS ───────────────────────────────────────────

async fn create_task(
    State(service): State<AppState>,
    Json(body): Json<TaskCreate>,
) -> Result<Json<Value>, ApiError> {
    let priority = match body.priority.as_deref() {
        Some(raw) => raw
            .parse::<TaskPriority>()
            .map_err(ApiError::bad_request)?,
        None => TaskPriority::default(),
    };

    let task = service.create_task(body.title, body.description, priority)?;
    Ok(Json(json!({ "success": true, "task": task })))
}

async fn get_task(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    match service.get_task(&id)? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::not_found(format!("Task {} not found", id))),
    }
}

async fn update_task(
    State(service): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TaskUpdate>,
) -> Result<Json<Value>, ApiError> {
    let mut changes = serde_json::Map::new();
    if let Some(status) = body.status {
        changes.insert("status".to_string(), Value::String(status));
    }
    if let Some(priority) = body.priority {
        changes.insert("priority".to_string(), Value::String(priority));
    }
    if let Some(description) = body.description {
        changes.insert("description".to_string(), Value::String(description));
    }

    if changes.is_empty() {
        return Err(ApiError::bad_request("No updates provided"));
    }

    let task = service.update_task(&id, changes)?;
    Ok(Json(json!({ "success": true, "task": task })))
}

async fn list_tasks(
    State(service): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let status = match params.status.as_deref() {
        Some(raw) => Some(raw.parse::<TaskStatus>().map_err(ApiError::bad_request)?),
        None => None,
    };

    let tasks = service.list_tasks(status)?;
    Ok(Json(json!({ "count": tasks.len(), "tasks": tasks })))
}

async fn escalate_task(
    State(service): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<EscalateParams>,
) -> Result<Json<Value>, ApiError> {
    let reason = params
        .reason
        .unwrap_or_else(|| "Manual escalation".to_string());
    let task = service.escalate_task(&id, reason)?;
    Ok(Json(json!({ "success": true, "task": task })))
}

// ─── DIAGNOSTICS ────────────────────────────────────────────────────

async fn get_logs(
    State(service): State<AppState>,
    Query(params): Query<LogParams>,
) -> Result<Json<Value>, ApiError> {
    let (count, logs) = service.recent_logs(params.limit.unwrap_or(10))?;
    Ok(Json(json!({ "count": count, "logs": logs })))
}

async fn health(State(service): State<AppState>) -> Json<Value> {
    let backend = service.classifier_backend();
    let reachable = backend.health_check().await;
    let models = backend.available_models().await.unwrap_or_default();

    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "service": "taskflow",
        "classifier": {
            "backend": backend.name(),
            "model": backend.model(),
            "status": if reachable { "connected" } else { "disconnected" },
            "url": service.config().classifier.base_url,
            "available_models": models,
        }
    }))
}

async fn reset(State(service): State<AppState>) -> Result<Json<Value>, ApiError> {
    service.reset()?;
    Ok(Json(json!({
        "success": true,
        "message": "Database reset successfully",
    })))
}
