//! In-memory stores for tests and database-free runs

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FeedbackStore, SessionStore, StoreResult};
use crate::models::{Feedback, Session, UpdateSession};

/// Session store backed by a vector behind an async lock
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<Vec<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn list_all(&self) -> StoreResult<Vec<Session>> {
        let mut sessions = self.sessions.read().await.clone();
        sessions.sort_by_key(|s| Reverse((s.created_at, s.id)));
        Ok(sessions)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, session: Session) -> StoreResult<Session> {
        self.sessions.write().await.push(session.clone());
        Ok(session)
    }

    async fn modify(&self, id: Uuid, update: UpdateSession) -> StoreResult<Option<Session>> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.iter_mut().find(|s| s.id == id).map(|session| {
            session.apply(update);
            session.clone()
        }))
    }

    async fn remove(&self, id: Uuid) -> StoreResult<Option<Session>> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions
            .iter()
            .position(|s| s.id == id)
            .map(|index| sessions.remove(index)))
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}

/// Feedback store backed by a vector behind an async lock
#[derive(Default)]
pub struct MemoryFeedbackStore {
    messages: RwLock<Vec<Feedback>>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn list_all(&self) -> StoreResult<Vec<Feedback>> {
        let mut messages = self.messages.read().await.clone();
        messages.sort_by_key(|f| Reverse((f.created_at, f.id)));
        Ok(messages)
    }

    async fn insert(&self, feedback: Feedback) -> StoreResult<Feedback> {
        self.messages.write().await.push(feedback.clone());
        Ok(feedback)
    }
}
