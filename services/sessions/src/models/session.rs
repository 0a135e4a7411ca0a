//! Session model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{next_timestamp, timestamp_now};

pub const DEFAULT_TITLE: &str = "Focus Session";
pub const DEFAULT_SUBJECT: &str = "General";
pub const DEFAULT_FOCUS_RATING: i32 = 3;

/// One logged focus interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub duration_minutes: i32,
    pub focus_rating: i32,
    pub completed: bool,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated session creation payload with defaults applied
///
/// `date` stays unset until the record is stamped so that it defaults to the
/// creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub title: String,
    pub subject: String,
    pub duration_minutes: i32,
    pub focus_rating: i32,
    pub completed: bool,
    pub date: Option<DateTime<Utc>>,
}

/// Validated partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateSession {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub duration_minutes: Option<i32>,
    pub focus_rating: Option<i32>,
    pub completed: Option<bool>,
    pub date: Option<DateTime<Utc>>,
}

impl NewSession {
    /// Payload carrying only the required duration
    pub fn with_duration(duration_minutes: i32) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            duration_minutes,
            focus_rating: DEFAULT_FOCUS_RATING,
            completed: false,
            date: None,
        }
    }

    /// Turn the payload into a record with a fresh identifier and timestamps
    pub fn into_session(self) -> Session {
        let now = timestamp_now();
        Session {
            id: Uuid::now_v7(),
            title: self.title,
            subject: self.subject,
            duration_minutes: self.duration_minutes,
            focus_rating: self.focus_rating,
            completed: self.completed,
            date: self.date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }
}

impl UpdateSession {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Session {
    /// Merge a partial update onto this record and advance `updated_at`
    pub fn apply(&mut self, update: UpdateSession) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(subject) = update.subject {
            self.subject = subject;
        }
        if let Some(duration_minutes) = update.duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        if let Some(focus_rating) = update.focus_rating {
            self.focus_rating = focus_rating;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        self.updated_at = next_timestamp(self.updated_at);
    }
}
