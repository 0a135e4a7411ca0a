//! Sessions service routes

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use tracing::error;

use crate::{
    error::{ApiError, ApiResult},
    middleware::cors_middleware,
    state::AppState,
};

/// Create the router for the sessions service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/sessions", get(list_sessions).post(create_session))
        .route(
            "/sessions/:id",
            get(get_session).patch(update_session).delete(delete_session),
        )
        .route("/feedback", get(list_feedback).post(create_feedback))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            cors_middleware,
        ))
        .with_state(state)
}

/// Liveness message
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Focus Session Tracker API is running" }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.session_store.health_check().await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "service": "sessions-service" })),
        ),
        outcome => {
            if let Err(e) = outcome {
                error!("Health check failed: {}", e);
            }
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "service": "sessions-service" })),
            )
        }
    }
}

/// Unwrap a JSON body, reporting malformed bodies as a bad request
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Loose truthiness of a JSON value: absent, null, false, 0 and "" are falsy
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// List all sessions, newest first
pub async fn list_sessions(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let sessions = state.session_store.list_all().await.map_err(|e| {
        error!("Failed to fetch sessions: {}", e);
        ApiError::InternalServerError("Failed to fetch sessions".to_string())
    })?;

    Ok(Json(sessions))
}

/// Get one session by ID
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = state.session_store.get_by_id(&id).await?;

    Ok(Json(session))
}

/// Create a session
pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let fields = json_body(payload)?;

    if !is_truthy(fields.get("durationMinutes")) {
        return Err(ApiError::BadRequest(
            "durationMinutes is required".to_string(),
        ));
    }

    let session = state.session_store.create(&fields).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Apply a partial update to a session
pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let fields = json_body(payload)?;
    let session = state.session_store.update(&id, &fields).await?;

    Ok(Json(session))
}

/// Delete a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.session_store.delete_by_id(&id).await?;

    Ok(Json(json!({ "message": "Session deleted" })))
}

/// List all feedback messages, newest first
pub async fn list_feedback(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let messages = state.feedback_store.list_all().await?;

    Ok(Json(messages))
}

/// Record a feedback message
pub async fn create_feedback(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let fields = json_body(payload)?;
    let feedback = state.feedback_store.create(&fields).await?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!(25))));
        assert!(is_truthy(Some(&json!(-3))));
        assert!(is_truthy(Some(&json!("25"))));
        assert!(is_truthy(Some(&json!([]))));
    }
}
