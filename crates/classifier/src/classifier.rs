//! The intent classifier.

use std::sync::Arc;

use crate::backend::ClassifierBackend;
use crate::parse::parse_decision;
use crate::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::types::{Classification, ExtractedFields, Intent, IntentDecision};

/// Classifies free-text task requests via a backend model.
///
/// `classify` never fails: a backend fault or an unparseable reply produces
/// a forced-escalate decision carrying the original error text, so callers
/// always receive a routable decision.
pub struct IntentClassifier {
    backend: Arc<dyn ClassifierBackend>,
}

impl IntentClassifier {
    /// Create a classifier over the given backend.
    pub fn new(backend: Arc<dyn ClassifierBackend>) -> Self {
        Self { backend }
    }

    /// The backend this classifier sends prompts to.
    pub fn backend(&self) -> &Arc<dyn ClassifierBackend> {
        &self.backend
    }

    /// The model name the backend is configured with.
    pub fn model(&self) -> String {
        self.backend.model().to_string()
    }

    /// Classify the user's input into a structured decision.
    pub async fn classify(&self, input: &str) -> Classification {
        let model = self.model();

        let reply = match self.backend.complete(SYSTEM_PROMPT, &user_prompt(input)).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("Intent classification failed: {}", e);
                return Self::forced_escalate(
                    model,
                    "Error during classification",
                    format!("Intent classification failed: {}", e),
                );
            }
        };

        match parse_decision(&reply) {
            Ok(decision) => Classification {
                decision,
                model,
                error: None,
            },
            Err(e) => {
                log::warn!("Could not parse classifier reply: {}", e);
                Self::forced_escalate(
                    model,
                    "Could not parse model response",
                    format!("Failed to parse model response: {}", e),
                )
            }
        }
    }

    fn forced_escalate(
        model: String,
        reasoning: &str,
        error: String,
    ) -> Classification {
        Classification {
            decision: IntentDecision {
                intent: Intent::Escalate,
                reasoning: reasoning.to_string(),
                extracted_data: ExtractedFields::default(),
            },
            model,
            error: Some(error),
        }
    }
}
