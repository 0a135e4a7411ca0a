//! Repositories for session and feedback persistence
//!
//! Each store exposes a handful of storage primitives; identifier parsing and
//! schema validation live in the provided trait methods so every backend
//! shares them.

use async_trait::async_trait;
use common::error::DatabaseError;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    models::{Feedback, Session, UpdateSession},
    validation::{
        ValidationErrors, validate_new_feedback, validate_new_session, validate_session_update,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryFeedbackStore, MemorySessionStore};
pub use postgres::{PgFeedbackStore, PgSessionStore};

/// Store-level error taxonomy
#[derive(Error, Debug)]
pub enum StoreError {
    /// Identifier is well-formed but no record matches
    #[error("Record not found")]
    NotFound,

    /// Identifier does not parse
    #[error("Malformed identifier: {0}")]
    MalformedId(String),

    /// Candidate record failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Backing storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
}

/// Type alias for store results
pub type StoreResult<T> = Result<T, StoreError>;

/// Parse a record identifier
pub fn parse_id(id: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| StoreError::MalformedId(id.to_string()))
}

/// Persistence of session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// All records, newest-created first
    async fn list_all(&self) -> StoreResult<Vec<Session>>;

    async fn find(&self, id: Uuid) -> StoreResult<Option<Session>>;

    async fn insert(&self, session: Session) -> StoreResult<Session>;

    /// Merge `update` onto the record in one atomic step and advance
    /// `updated_at`; `None` when no record matches
    async fn modify(&self, id: Uuid, update: UpdateSession) -> StoreResult<Option<Session>>;

    async fn remove(&self, id: Uuid) -> StoreResult<Option<Session>>;

    async fn health_check(&self) -> StoreResult<bool>;

    /// Fetch one record by its textual identifier
    async fn get_by_id(&self, id: &str) -> StoreResult<Session> {
        let id = parse_id(id)?;
        self.find(id).await?.ok_or(StoreError::NotFound)
    }

    /// Validate `fields` and persist a new record
    async fn create(&self, fields: &Value) -> StoreResult<Session> {
        let new_session = validate_new_session(fields)?;
        let session = self.insert(new_session.into_session()).await?;
        info!("Created session {}", session.id);
        Ok(session)
    }

    /// Validate the supplied subset of fields and merge it onto a record
    async fn update(&self, id: &str, fields: &Value) -> StoreResult<Session> {
        let id = parse_id(id)?;
        let update = validate_session_update(fields)?;
        if update.is_empty() {
            warn!("Update for session {} supplied no known fields", id);
        }

        let session = self.modify(id, update).await?.ok_or(StoreError::NotFound)?;
        info!("Updated session {}", session.id);
        Ok(session)
    }

    /// Remove a record, returning what was removed
    async fn delete_by_id(&self, id: &str) -> StoreResult<Session> {
        let id = parse_id(id)?;
        let session = self.remove(id).await?.ok_or(StoreError::NotFound)?;
        info!("Deleted session {}", session.id);
        Ok(session)
    }
}

/// Persistence of feedback messages
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// All messages, newest first
    async fn list_all(&self) -> StoreResult<Vec<Feedback>>;

    async fn insert(&self, feedback: Feedback) -> StoreResult<Feedback>;

    /// Validate `fields` and persist a new message
    async fn create(&self, fields: &Value) -> StoreResult<Feedback> {
        let new_feedback = validate_new_feedback(fields)?;
        let feedback = self.insert(new_feedback.into_feedback()).await?;
        info!("Recorded feedback {}", feedback.id);
        Ok(feedback)
    }
}
