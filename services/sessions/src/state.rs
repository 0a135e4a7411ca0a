//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    middleware::CorsPolicy,
    repositories::{FeedbackStore, MemoryFeedbackStore, MemorySessionStore, SessionStore},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session_store: Arc<dyn SessionStore>,
    pub feedback_store: Arc<dyn FeedbackStore>,
    pub cors_policy: Arc<CorsPolicy>,
}

impl AppState {
    pub fn new(
        session_store: Arc<dyn SessionStore>,
        feedback_store: Arc<dyn FeedbackStore>,
        cors_policy: CorsPolicy,
    ) -> Self {
        Self {
            session_store,
            feedback_store,
            cors_policy: Arc::new(cors_policy),
        }
    }

    /// State backed by fresh in-memory stores
    pub fn in_memory(cors_policy: CorsPolicy) -> Self {
        Self::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(MemoryFeedbackStore::new()),
            cors_policy,
        )
    }
}
