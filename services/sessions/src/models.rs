//! Record models for the sessions service

use chrono::{DateTime, Duration, SubsecRound, Utc};

pub mod feedback;
pub mod session;

pub use feedback::{Feedback, NewFeedback};
pub use session::{NewSession, Session, UpdateSession};

/// Current time at the precision the database stores
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Timestamp for a write that follows `previous`
///
/// Strictly later than `previous` even when the clock has not moved.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = timestamp_now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
