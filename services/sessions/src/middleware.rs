//! CORS middleware for browser clients

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

const ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Which browser origins may call the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    /// Development client origin, matched exactly
    pub dev_origin: String,
    /// Deployment platform domain, matched as a suffix
    pub platform_suffix: String,
    /// Additional origins matched exactly
    pub allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(dev_origin: String, platform_suffix: String, allowed_origins: Vec<String>) -> Self {
        Self {
            dev_origin,
            platform_suffix,
            allowed_origins,
        }
    }

    /// Whether a request carrying `origin` is allowed
    pub fn allows(&self, origin: &str) -> bool {
        (!self.dev_origin.is_empty() && origin == self.dev_origin)
            || (!self.platform_suffix.is_empty() && origin.ends_with(&self.platform_suffix))
            || self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new(
            "http://localhost:5173".to_string(),
            ".netlify.app".to_string(),
            Vec::new(),
        )
    }
}

/// Headers granting `origin` access to the response
fn apply_allow_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

/// Answer to a preflight request from an allowed origin
pub fn preflight_response(origin: HeaderValue) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    apply_allow_headers(headers, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}

/// CORS middleware
///
/// Requests without an `Origin` header pass through untouched.
pub async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(origin) = req.headers().get(header::ORIGIN).cloned() else {
        return Ok(next.run(req).await);
    };

    let allowed = origin
        .to_str()
        .map(|value| state.cors_policy.allows(value))
        .unwrap_or(false);

    if !allowed {
        warn!("Rejected request from origin {:?}", origin);
        return Err(ApiError::Forbidden("Not allowed by CORS".to_string()));
    }

    if req.method() == Method::OPTIONS {
        return Ok(preflight_response(origin));
    }

    let mut response = next.run(req).await;
    apply_allow_headers(response.headers_mut(), origin);

    Ok(response)
}
