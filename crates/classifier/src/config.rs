//! Configuration for the classifier backend

/// Connection and sampling settings for the Ollama backend.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model name (e.g., "mistral:latest").
    pub model: String,
    /// Sampling temperature. Low values keep the JSON replies deterministic.
    pub temperature: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "mistral:latest".to_string(),
            temperature: 0.1,
        }
    }
}

impl ClassifierConfig {
    /// Build a config from the environment.
    ///
    /// Reads `OLLAMA_BASE_URL`, `OLLAMA_MODEL`, and `TEMPERATURE`, falling
    /// back to the defaults for anything unset. An unparseable temperature
    /// is reported and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("OLLAMA_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            config.model = model;
        }
        if let Ok(raw) = std::env::var("TEMPERATURE") {
            match raw.parse::<f32>() {
                Ok(temperature) => config.temperature = temperature,
                Err(_) => log::warn!("Ignoring unparseable TEMPERATURE value '{}'", raw),
            }
        }

        config
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
