//! Pluggable classifier backend abstraction
//!
//! The workflow engine only ever talks to [`ClassifierBackend`]; which model
//! server sits behind it is an implementation detail. The production backend
//! is Ollama, tests substitute stubs.

pub mod ollama;

use async_trait::async_trait;

pub use ollama::OllamaBackend;

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inference error: {0}")]
    Inference(String),
}

/// A completion endpoint the classifier can send its prompt to.
///
/// Implementations are HTTP clients talking to a model server. `complete`
/// blocks for the full model latency; callers wanting timeouts impose them
/// at this boundary.
#[async_trait]
pub trait ClassifierBackend: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &'static str;

    /// The model this backend is configured to use.
    fn model(&self) -> &str;

    /// Send a system prompt plus user prompt, return the raw reply text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, BackendError>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Models the backend advertises, for diagnostics.
    async fn available_models(&self) -> Result<Vec<String>, BackendError> {
        Ok(Vec::new())
    }
}
