//! Ollama backend implementation
//!
//! Talks to an Ollama daemon over HTTP using the non-streaming
//! `/api/generate` endpoint. Ollama manages model loading itself; this
//! client only needs a base URL and a model name.

use async_trait::async_trait;
use serde::Deserialize;

use super::{BackendError, ClassifierBackend};
use crate::config::ClassifierConfig;

/// Response structure from the Ollama generate API
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Response structure from the Ollama tags API
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Classifier backend using a local Ollama server.
pub struct OllamaBackend {
    /// HTTP client for API requests
    http_client: reqwest::Client,
    /// Base URL of the Ollama server
    base_url: String,
    /// Model name to generate with
    model: String,
    /// Sampling temperature
    temperature: f32,
}

impl OllamaBackend {
    /// Create a backend from the given configuration.
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

#[async_trait]
impl ClassifierBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/generate", self.base_url);

        let request_body = serde_json::json!({
            "model": self.model,
            "system": system,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": self.temperature }
        });

        log::debug!(
            "Sending classification request to {} with model '{}'",
            url,
            self.model
        );

        let response = self
            .http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(BackendError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Inference(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        let data: GenerateResponse = response.json().await.map_err(|e| {
            BackendError::Inference(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(data.response)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.http_client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn available_models(&self) -> Result<Vec<String>, BackendError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(BackendError::Http)?;

        if !response.status().is_success() {
            return Err(BackendError::Inference(format!(
                "Ollama API error ({})",
                response.status()
            )));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            BackendError::Inference(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}
