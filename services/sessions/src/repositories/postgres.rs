//! PostgreSQL-backed stores

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::PgPool;
use uuid::Uuid;

use super::{FeedbackStore, SessionStore, StoreResult};
use crate::models::{Feedback, Session, UpdateSession, timestamp_now};

const SESSION_COLUMNS: &str = "id, title, subject, duration_minutes, focus_rating, completed, date, created_at, updated_at";

/// Session repository for database operations
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn list_all(&self) -> StoreResult<Vec<Session>> {
        let sessions = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(sessions)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(session)
    }

    async fn insert(&self, session: Session) -> StoreResult<Session> {
        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            INSERT INTO sessions (
                id, title, subject, duration_minutes, focus_rating, completed,
                date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(&session.title)
        .bind(&session.subject)
        .bind(session.duration_minutes)
        .bind(session.focus_rating)
        .bind(session.completed)
        .bind(session.date)
        .bind(session.created_at)
        .bind(session.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(session)
    }

    async fn modify(&self, id: Uuid, update: UpdateSession) -> StoreResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            UPDATE sessions SET
                title = COALESCE($2, title),
                subject = COALESCE($3, subject),
                duration_minutes = COALESCE($4, duration_minutes),
                focus_rating = COALESCE($5, focus_rating),
                completed = COALESCE($6, completed),
                date = COALESCE($7, date),
                updated_at = GREATEST($8, updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.title)
        .bind(update.subject)
        .bind(update.duration_minutes)
        .bind(update.focus_rating)
        .bind(update.completed)
        .bind(update.date)
        .bind(timestamp_now())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(session)
    }

    async fn remove(&self, id: Uuid) -> StoreResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "DELETE FROM sessions WHERE id = $1 RETURNING {SESSION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(session)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(common::database::health_check(&self.pool).await?)
    }
}

/// Feedback repository for database operations
#[derive(Clone)]
pub struct PgFeedbackStore {
    pool: PgPool,
}

impl PgFeedbackStore {
    /// Create a new feedback repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn list_all(&self) -> StoreResult<Vec<Feedback>> {
        let messages = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, message, created_at, updated_at
            FROM feedback
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(messages)
    }

    async fn insert(&self, feedback: Feedback) -> StoreResult<Feedback> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (id, message, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, message, created_at, updated_at
            "#,
        )
        .bind(feedback.id)
        .bind(&feedback.message)
        .bind(feedback.created_at)
        .bind(feedback.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(feedback)
    }
}
