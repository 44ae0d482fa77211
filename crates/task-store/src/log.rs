//! Bounded append-only execution log.

use std::path::Path;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::Result;
use crate::storage::JsonStorage;

/// How many entries the log retains by default.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Append-only log of workflow runs.
///
/// Entries are opaque JSON documents; the caller owns their shape. The log
/// keeps only the most recent `capacity` entries, dropping the oldest first,
/// and uses the same whole-file persistence policy as the task store.
pub struct ExecutionLog {
    storage: JsonStorage<Vec<Value>>,
    lock: Mutex<()>,
    capacity: usize,
}

impl ExecutionLog {
    /// Create a log backed by the given JSON file, retaining the default
    /// 100 entries.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_capacity(path, DEFAULT_LOG_CAPACITY)
    }

    /// Create a log with an explicit retention capacity.
    pub fn with_capacity(path: impl AsRef<Path>, capacity: usize) -> Self {
        Self {
            storage: JsonStorage::new(path.as_ref()),
            lock: Mutex::new(()),
            capacity,
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Append one entry, evicting the oldest entries past capacity.
    pub fn append(&self, entry: Value) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.storage.load()?;

        entries.push(entry);
        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }

        self.storage.save(&entries)
    }

    /// All retained entries, oldest first.
    pub fn all(&self) -> Result<Vec<Value>> {
        let _guard = self.lock.lock();
        self.storage.load()
    }

    /// The most recent `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<Value>> {
        let entries = self.all()?;
        let skip = entries.len().saturating_sub(limit);
        Ok(entries.into_iter().skip(skip).collect())
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock();
        self.storage.save(&Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(n: usize) -> Value {
        serde_json::json!({ "run": n })
    }

    #[test]
    fn test_entries_kept_in_call_order() {
        let dir = TempDir::new().unwrap();
        let log = ExecutionLog::new(dir.path().join("logs.json"));

        for n in 0..5 {
            log.append(entry(n)).unwrap();
        }

        let all = log.all().unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0], entry(0));
        assert_eq!(all[4], entry(4));
    }

    #[test]
    fn test_oldest_evicted_past_capacity() {
        let dir = TempDir::new().unwrap();
        let log = ExecutionLog::with_capacity(dir.path().join("logs.json"), 100);

        for n in 0..105 {
            log.append(entry(n)).unwrap();
        }

        let all = log.all().unwrap();
        assert_eq!(all.len(), 100);
        assert_eq!(all[0], entry(5));
        assert_eq!(all[99], entry(104));
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let dir = TempDir::new().unwrap();
        let log = ExecutionLog::new(dir.path().join("logs.json"));

        for n in 0..10 {
            log.append(entry(n)).unwrap();
        }

        let recent = log.recent(3).unwrap();
        assert_eq!(recent, vec![entry(7), entry(8), entry(9)]);

        // A limit larger than the log returns everything.
        assert_eq!(log.recent(50).unwrap().len(), 10);
    }

    #[test]
    fn test_corrupt_log_restarts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs.json");
        let log = ExecutionLog::new(&path);

        log.append(entry(1)).unwrap();
        std::fs::write(&path, "][").unwrap();

        log.append(entry(2)).unwrap();
        assert_eq!(log.all().unwrap(), vec![entry(2)]);
    }

    #[test]
    fn test_clear_empties_the_log() {
        let dir = TempDir::new().unwrap();
        let log = ExecutionLog::new(dir.path().join("logs.json"));
        log.append(entry(1)).unwrap();

        log.clear().unwrap();
        assert!(log.all().unwrap().is_empty());
    }
}
