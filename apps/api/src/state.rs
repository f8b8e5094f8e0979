use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::analysis::vocabulary::Vocabulary;
use crate::config::Config;
use crate::parser::DocumentExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Skills dictionary, built once at startup and read-only afterwards.
    pub vocabulary: Arc<Vocabulary>,
    /// Pluggable document-to-text backend. Default: ResumeTextExtractor.
    pub extractor: Arc<dyn DocumentExtractor>,
    pub started_at: DateTime<Utc>,
}
