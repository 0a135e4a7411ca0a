//! Record schema: field validation and coercion
//!
//! Candidates arrive as raw JSON so that type errors can be reported per
//! field instead of failing the whole body at deserialization time. Every
//! failing field is collected before returning.

use std::{fmt, sync::LazyLock};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::models::{
    NewFeedback, NewSession, UpdateSession,
    session::{DEFAULT_FOCUS_RATING, DEFAULT_SUBJECT, DEFAULT_TITLE},
};

pub const FOCUS_RATING_MIN: i64 = 1;
pub const FOCUS_RATING_MAX: i64 = 5;
pub const DURATION_MIN: i64 = 1;
pub const DURATION_MAX: i64 = i32::MAX as i64;

/// Earliest instant a `timestamptz` column can hold (4713 BC)
static EARLIEST_DATE: LazyLock<DateTime<Utc>> = LazyLock::new(|| {
    NaiveDate::from_ymd_opt(-4712, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
});

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required field absent or null
    Missing,
    /// Number below the allowed minimum
    TooSmall { min: i64 },
    /// Number above the allowed maximum
    TooLarge { max: i64 },
    /// Number outside a closed range
    OutOfRange { min: i64, max: i64 },
    /// Date earlier than storage can represent
    DateTooEarly,
    /// Value could not be coerced to the field type
    WrongType { expected: &'static str },
}

/// A constraint violation on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl FieldError {
    fn missing(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Missing,
        }
    }

    fn wrong_type(field: &'static str, expected: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::WrongType { expected },
        }
    }

    fn with_kind(field: &'static str, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{} is required", self.field),
            FieldErrorKind::TooSmall { min } => {
                write!(f, "{} must be at least {}", self.field, min)
            }
            FieldErrorKind::TooLarge { max } => {
                write!(f, "{} is too large (at most {})", self.field, max)
            }
            FieldErrorKind::OutOfRange { min, max } => {
                write!(f, "{} must be between {} and {}", self.field, min, max)
            }
            FieldErrorKind::WrongType { expected } => {
                write!(f, "{} must be {}", self.field, expected)
            }
            FieldErrorKind::DateTooEarly => {
                write!(f, "{} must not be earlier than 4713 BC", self.field)
            }
        }
    }
}

/// Every field that failed validation for one candidate record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub model: &'static str,
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Whether a given field is among the failures
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation failed: ", self.model)?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", error.field, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects coerced values and field errors for one candidate
struct Checker<'a> {
    fields: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Checker<'a> {
    fn new(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    /// Run `coerce` on a supplied non-null field
    ///
    /// Returns `None` when the field is absent or null, or when coercion
    /// failed (the failure is recorded).
    fn optional<T>(
        &mut self,
        field: &'static str,
        coerce: impl FnOnce(&'static str, &Value) -> Result<T, FieldError>,
    ) -> Option<T> {
        match self.fields.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.record(coerce(field, value)),
        }
    }

    /// Like `optional`, but an explicit null is a type error
    fn patch<T>(
        &mut self,
        field: &'static str,
        expected: &'static str,
        coerce: impl FnOnce(&'static str, &Value) -> Result<T, FieldError>,
    ) -> Option<T> {
        match self.fields.get(field) {
            None => None,
            Some(Value::Null) => {
                self.errors.push(FieldError::wrong_type(field, expected));
                None
            }
            Some(value) => self.record(coerce(field, value)),
        }
    }

    fn required<T>(
        &mut self,
        field: &'static str,
        coerce: impl FnOnce(&'static str, &Value) -> Result<T, FieldError>,
    ) -> Option<T> {
        match self.fields.get(field) {
            None | Some(Value::Null) => {
                self.errors.push(FieldError::missing(field));
                None
            }
            Some(value) => self.record(coerce(field, value)),
        }
    }

    fn record<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    fn finish(self, model: &'static str) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                model,
                errors: self.errors,
            })
        }
    }
}

fn as_object<'a>(
    model: &'static str,
    candidate: &'a Value,
) -> Result<&'a Map<String, Value>, ValidationErrors> {
    candidate.as_object().ok_or_else(|| ValidationErrors {
        model,
        errors: vec![FieldError::wrong_type("body", "a JSON object")],
    })
}

/// Trimmed text; numbers and booleans take their string form
fn text(field: &'static str, value: &Value) -> Result<String, FieldError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(FieldError::wrong_type(field, "a string")),
    }
}

/// Whole number from an integer, an integral float, or a numeric string
fn integer(field: &'static str, value: &Value) -> Result<i64, FieldError> {
    let wrong_type = || FieldError::wrong_type(field, "an integer");
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
                _ => Err(wrong_type()),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| wrong_type()),
        _ => Err(wrong_type()),
    }
}

fn positive_minutes(field: &'static str, value: &Value) -> Result<i32, FieldError> {
    let n = integer(field, value)?;
    if n < DURATION_MIN {
        return Err(FieldError::with_kind(field, FieldErrorKind::TooSmall { min: DURATION_MIN }));
    }
    i32::try_from(n)
        .map_err(|_| FieldError::with_kind(field, FieldErrorKind::TooLarge { max: DURATION_MAX }))
}

fn rating(field: &'static str, value: &Value) -> Result<i32, FieldError> {
    let n = integer(field, value)?;
    if !(FOCUS_RATING_MIN..=FOCUS_RATING_MAX).contains(&n) {
        return Err(FieldError::with_kind(
            field,
            FieldErrorKind::OutOfRange {
                min: FOCUS_RATING_MIN,
                max: FOCUS_RATING_MAX,
            },
        ));
    }
    // Range checked above
    Ok(n as i32)
}

/// Boolean, `"true"` / `"false"`, or `1` / `0`
fn boolean(field: &'static str, value: &Value) -> Result<bool, FieldError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(FieldError::wrong_type(field, "a boolean")),
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(FieldError::wrong_type(field, "a boolean")),
        },
        _ => Err(FieldError::wrong_type(field, "a boolean")),
    }
}

/// RFC 3339 timestamp, calendar date, or epoch milliseconds
fn timestamp(field: &'static str, value: &Value) -> Result<DateTime<Utc>, FieldError> {
    let wrong_type = || FieldError::wrong_type(field, "a date");
    let parsed = match value {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|dt| dt.and_utc())
                })
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    };
    let parsed = parsed
        .map(|dt| chrono::SubsecRound::trunc_subsecs(dt, 6))
        .ok_or_else(wrong_type)?;
    if parsed < *EARLIEST_DATE {
        return Err(FieldError::with_kind(field, FieldErrorKind::DateTooEarly));
    }
    Ok(parsed)
}

/// Validate a creation candidate, applying defaults to absent fields
pub fn validate_new_session(candidate: &Value) -> Result<NewSession, ValidationErrors> {
    let fields = as_object("Session", candidate)?;
    let mut checker = Checker::new(fields);

    let title = checker.optional("title", text);
    let subject = checker.optional("subject", text);
    let duration_minutes = checker.required("durationMinutes", positive_minutes);
    let focus_rating = checker.optional("focusRating", rating);
    let completed = checker.optional("completed", boolean);
    let date = checker.optional("date", timestamp);

    checker.finish("Session")?;

    Ok(NewSession {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        subject: subject.unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        // A passing checker means the required field was coerced
        duration_minutes: duration_minutes.unwrap_or_default(),
        focus_rating: focus_rating.unwrap_or(DEFAULT_FOCUS_RATING),
        completed: completed.unwrap_or(false),
        date,
    })
}

/// Validate a partial update; only supplied fields are checked
pub fn validate_session_update(candidate: &Value) -> Result<UpdateSession, ValidationErrors> {
    let fields = as_object("Session", candidate)?;
    let mut checker = Checker::new(fields);

    let title = checker.patch("title", "a string", text);
    let subject = checker.patch("subject", "a string", text);
    let duration_minutes = match fields.get("durationMinutes") {
        None => None,
        Some(_) => checker.required("durationMinutes", positive_minutes),
    };
    let focus_rating = checker.patch("focusRating", "an integer", rating);
    let completed = checker.patch("completed", "a boolean", boolean);
    let date = checker.patch("date", "a date", timestamp);

    checker.finish("Session")?;

    Ok(UpdateSession {
        title,
        subject,
        duration_minutes,
        focus_rating,
        completed,
        date,
    })
}

/// Validate a feedback candidate; the message must be non-empty once trimmed
pub fn validate_new_feedback(candidate: &Value) -> Result<NewFeedback, ValidationErrors> {
    let fields = as_object("Feedback", candidate)?;
    let mut checker = Checker::new(fields);

    let message = checker
        .required("message", text)
        .filter(|message| !message.is_empty());
    if message.is_none() && checker.errors.is_empty() {
        checker.errors.push(FieldError::missing("message"));
    }

    checker.finish("Feedback")?;

    Ok(NewFeedback {
        message: message.unwrap_or_default(),
    })
}
