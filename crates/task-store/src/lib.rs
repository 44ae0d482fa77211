//! Durable task collection and execution log
//!
//! This crate provides the two persistent collections the workflow agent
//! depends on: a task store with auto-incrementing `TASK-%04d` ids and
//! per-task change history, and a bounded append-only execution log.
//!
//! Both collections share the same persistence policy: the whole document is
//! read from its JSON file at the start of every operation and written back
//! in full at the end. A missing or unreadable file loads as an empty
//! collection, so external tooling can delete or edit the files between
//! calls without breaking the store.

pub mod error;
pub mod log;
pub mod storage;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use log::{ExecutionLog, DEFAULT_LOG_CAPACITY};
pub use storage::JsonStorage;
pub use store::{TaskCollection, TaskStore};
pub use types::{HistoryEntry, Task, TaskPriority, TaskStatus};
