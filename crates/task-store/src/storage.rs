//! Whole-document JSON file persistence.
//!
//! Both the task collection and the execution log persist through this
//! helper: read the whole file at the start of an operation, write the whole
//! file back at the end. There is no cache between calls, so external
//! modification of the file between operations is tolerated.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// A JSON document stored at a fixed path.
///
/// A missing file, an empty file, or a file whose content does not parse all
/// load as `T::default()` instead of failing; only genuine I/O faults are
/// surfaced. Unparseable content is reported with a warning before the
/// document is reinitialized.
#[derive(Debug)]
pub struct JsonStorage<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonStorage<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    /// Create storage backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document.
    pub fn load(&self) -> Result<T> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(T::default());
        }

        match serde_json::from_str(&content) {
            Ok(value) => Ok(value),
            Err(e) => {
                log::warn!(
                    "Unreadable content in {}: {}. Reinitializing as empty.",
                    self.path.display(),
                    e
                );
                Ok(T::default())
            }
        }
    }

    /// Write the whole document, creating parent directories as needed.
    pub fn save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
