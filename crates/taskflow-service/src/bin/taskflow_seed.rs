//! `taskflow-seed` — populate the store and log with sample data.
//!
//! Writes five tasks (with realistic statuses and histories spread over the
//! past week) and five execution-log entries, overwriting whatever the
//! configured files currently hold.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use classifier::Intent;
use task_store::{
    ExecutionLog, HistoryEntry, JsonStorage, Task, TaskCollection, TaskPriority, TaskStatus,
};
use taskflow_service::ServiceConfig;
use workflow_engine::{ClassifierOutput, ExecutionRecord, TraceStep};

const SEED_MODEL: &str = "mistral:latest";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::from_env();
    let now = Utc::now();

    let collection = sample_tasks(now);
    let task_count = collection.tasks.len();
    JsonStorage::new(&config.storage_file).save(&collection)?;
    println!(
        "Wrote {} sample tasks to {}",
        task_count,
        config.storage_file.display()
    );

    let log = ExecutionLog::new(&config.logs_file);
    log.clear()?;
    let records = sample_records(now);
    let record_count = records.len();
    for record in records {
        log.append(serde_json::to_value(record)?)?;
    }
    println!(
        "Wrote {} sample log entries to {}",
        record_count,
        config.logs_file.display()
    );

    for task in collection.tasks.values() {
        println!("  {}: {} [{} / {}]", task.id, task.title, task.priority, task.status);
    }

    Ok(())
}

fn sample_tasks(now: DateTime<Utc>) -> TaskCollection {
    let mut tasks = BTreeMap::new();

    tasks.insert(
        "TASK-0001".to_string(),
        sample_task(
            "TASK-0001",
            "Review Q4 Financial Reports",
            "Comprehensive review of Q4 financial reports and budget analysis",
            TaskPriority::High,
            TaskStatus::InProgress,
            now - Duration::days(5),
            now - Duration::days(1),
            vec![status_change(now - Duration::days(2), "in_progress")],
        ),
    );
    tasks.insert(
        "TASK-0002".to_string(),
        sample_task(
            "TASK-0002",
            "Update Product Documentation",
            "Update user documentation with latest feature releases",
            TaskPriority::Medium,
            TaskStatus::Pending,
            now - Duration::days(3),
            now - Duration::days(3),
            Vec::new(),
        ),
    );
    tasks.insert(
        "TASK-0003".to_string(),
        sample_task(
            "TASK-0003",
            "Client Meeting Preparation",
            "Prepare presentation and materials for Acme Corp meeting",
            TaskPriority::High,
            TaskStatus::Completed,
            now - Duration::days(7),
            now - Duration::days(1),
            vec![
                status_change(now - Duration::days(6), "in_progress"),
                status_change(now - Duration::days(1), "completed"),
            ],
        ),
    );
    tasks.insert(
        "TASK-0004".to_string(),
        sample_task(
            "TASK-0004",
            "Code Review - Authentication Module",
            "Review pull request for new authentication system",
            TaskPriority::High,
            TaskStatus::Pending,
            now - Duration::days(2),
            now - Duration::days(2),
            Vec::new(),
        ),
    );
    tasks.insert(
        "TASK-0005".to_string(),
        sample_task(
            "TASK-0005",
            "Marketing Campaign Analysis",
            "Analyze performance metrics for Q1 marketing campaigns",
            TaskPriority::Medium,
            TaskStatus::InProgress,
            now - Duration::days(4),
            now - Duration::hours(12),
            vec![status_change(now - Duration::hours(12), "in_progress")],
        ),
    );

    TaskCollection { tasks, counter: 5 }
}

#[allow(clippy::too_many_arguments)]
fn sample_task(
    id: &str,
    title: &str,
    description: &str,
    priority: TaskPriority,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    history: Vec<HistoryEntry>,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        priority,
        status,
        created_at,
        updated_at,
        history,
        escalation_reason: None,
        escalated_at: None,
        extra: serde_json::Map::new(),
    }
}

fn status_change(timestamp: DateTime<Utc>, status: &str) -> HistoryEntry {
    let mut changes = serde_json::Map::new();
    changes.insert("status".to_string(), serde_json::json!(status));
    HistoryEntry { timestamp, changes }
}

fn sample_records(now: DateTime<Utc>) -> Vec<ExecutionRecord> {
    vec![
        create_record(
            now - Duration::days(5),
            "Create a high priority task to review Q4 financial reports",
            "TASK-0001",
            "User wants to create a new high priority task",
        ),
        create_record(
            now - Duration::days(3),
            "Create task to update product documentation",
            "TASK-0002",
            "User wants a new documentation task",
        ),
        update_record(
            now - Duration::days(2),
            "Update TASK-0001 status to in_progress",
            "TASK-0001",
            "in_progress",
        ),
        update_record(
            now - Duration::days(1),
            "Update TASK-0003 status to completed",
            "TASK-0003",
            "completed",
        ),
        escalate_record(
            now - Duration::hours(6),
            "I need help planning the entire Q2 marketing strategy",
            "Complex request requiring human expertise and strategic planning",
        ),
    ]
}

fn create_record(
    timestamp: DateTime<Utc>,
    input: &str,
    task_id: &str,
    reasoning: &str,
) -> ExecutionRecord {
    ExecutionRecord {
        execution_id: format!("run-{}", uuid::Uuid::new_v4()),
        timestamp,
        input: input.to_string(),
        intent: Some(Intent::Create),
        task_id: Some(task_id.to_string()),
        result: format!("Task created successfully: {}", task_id),
        trace: vec![
            TraceStep::IntentClassifier {
                timestamp,
                model: SEED_MODEL.to_string(),
                output: Some(ClassifierOutput {
                    intent: Intent::Create,
                    reasoning: reasoning.to_string(),
                }),
                error: None,
            },
            TraceStep::CreateUpdateTask {
                timestamp,
                action: Some(Intent::Create),
                task_id: Some(task_id.to_string()),
                updates: None,
                error: None,
            },
            TraceStep::ConfirmAndLog {
                timestamp,
                final_result: format!("Task created successfully: {}", task_id),
            },
        ],
        error: None,
    }
}

fn update_record(
    timestamp: DateTime<Utc>,
    input: &str,
    task_id: &str,
    status: &str,
) -> ExecutionRecord {
    let mut updates = serde_json::Map::new();
    updates.insert("status".to_string(), serde_json::json!(status));

    ExecutionRecord {
        execution_id: format!("run-{}", uuid::Uuid::new_v4()),
        timestamp,
        input: input.to_string(),
        intent: Some(Intent::Update),
        task_id: Some(task_id.to_string()),
        result: format!("Task updated successfully: {}", task_id),
        trace: vec![
            TraceStep::IntentClassifier {
                timestamp,
                model: SEED_MODEL.to_string(),
                output: Some(ClassifierOutput {
                    intent: Intent::Update,
                    reasoning: "User wants to update an existing task".to_string(),
                }),
                error: None,
            },
            TraceStep::CreateUpdateTask {
                timestamp,
                action: Some(Intent::Update),
                task_id: Some(task_id.to_string()),
                updates: Some(updates),
                error: None,
            },
            TraceStep::ConfirmAndLog {
                timestamp,
                final_result: format!("Task updated successfully: {}", task_id),
            },
        ],
        error: None,
    }
}

fn escalate_record(timestamp: DateTime<Utc>, input: &str, reasoning: &str) -> ExecutionRecord {
    ExecutionRecord {
        execution_id: format!("run-{}", uuid::Uuid::new_v4()),
        timestamp,
        input: input.to_string(),
        intent: Some(Intent::Escalate),
        task_id: None,
        result: "Request escalated to human review".to_string(),
        trace: vec![
            TraceStep::IntentClassifier {
                timestamp,
                model: SEED_MODEL.to_string(),
                output: Some(ClassifierOutput {
                    intent: Intent::Escalate,
                    reasoning: reasoning.to_string(),
                }),
                error: None,
            },
            TraceStep::EscalateToHuman {
                timestamp,
                reason: reasoning.to_string(),
            },
            TraceStep::ConfirmAndLog {
                timestamp,
                final_result: "Request escalated to human review".to_string(),
            },
        ],
        error: None,
    }
}
