//! Intent classification for natural-language task requests
//!
//! This crate wraps an external language model behind a small contract: feed
//! it the user's text, get back a structured decision — one of three intents
//! (`create`, `update`, `escalate`), the model's reasoning, and whatever task
//! fields it extracted.
//!
//! The classifier is total. A backend that cannot be reached or a reply that
//! does not parse never surfaces as an error; both produce a forced-escalate
//! decision with the original fault recorded alongside it. Escalation is the
//! universal fallback.

pub mod backend;
pub mod classifier;
pub mod config;
pub mod parse;
pub mod prompt;
pub mod types;

pub use backend::{BackendError, ClassifierBackend, OllamaBackend};
pub use classifier::IntentClassifier;
pub use config::ClassifierConfig;
pub use parse::{parse_decision, strip_code_fence, ParseError};
pub use types::{Classification, ExtractedFields, Intent, IntentDecision};
