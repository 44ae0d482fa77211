//! Service configuration.

use std::path::PathBuf;

use classifier::ClassifierConfig;

/// Everything the service needs to start: file locations, listen address,
/// and the classifier backend settings.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Where the task collection lives.
    pub storage_file: PathBuf,
    /// Where the execution log lives.
    pub logs_file: PathBuf,
    /// Address the HTTP server binds to.
    pub listen: String,
    /// Classifier backend settings.
    pub classifier: ClassifierConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            storage_file: PathBuf::from("tasks_db.json"),
            logs_file: PathBuf::from("execution_logs.json"),
            listen: "0.0.0.0:8000".to_string(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Build a config from the environment.
    ///
    /// Reads `STORAGE_FILE`, `LOGS_FILE`, and `LISTEN_ADDR`, plus the
    /// classifier variables (`OLLAMA_BASE_URL`, `OLLAMA_MODEL`,
    /// `TEMPERATURE`). Anything unset falls back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self {
            classifier: ClassifierConfig::from_env(),
            ..Self::default()
        };

        if let Ok(path) = std::env::var("STORAGE_FILE") {
            config.storage_file = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LOGS_FILE") {
            config.logs_file = PathBuf::from(path);
        }
        if let Ok(listen) = std::env::var("LISTEN_ADDR") {
            config.listen = listen;
        }

        config
    }
}
