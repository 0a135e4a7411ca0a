//! Feedback model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::timestamp_now;

/// Free-text feedback message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated feedback creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub message: String,
}

impl NewFeedback {
    pub fn into_feedback(self) -> Feedback {
        let now = timestamp_now();
        Feedback {
            id: Uuid::now_v7(),
            message: self.message,
            created_at: now,
            updated_at: now,
        }
    }
}
