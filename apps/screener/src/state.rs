use std::sync::Arc;

use crate::config::Config;
use crate::extraction::ner::TokenClassifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable token classifier. `BertTokenClassifier` when `NER_MODEL_DIR` is set,
    /// otherwise `DisabledClassifier` (regex fallbacks only).
    pub classifier: Arc<dyn TokenClassifier>,
}
