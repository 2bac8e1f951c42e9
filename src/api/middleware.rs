//! API Middleware
//!
//! Request context, bearer-token authentication, and request logging.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::auth;
use crate::domain::RequestContext;
use crate::error::AppError;

use super::AppState;

/// Authenticated user resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

// =========================================================================
// Request Context Middleware
// =========================================================================

/// Attach a `RequestContext` to every request.
///
/// The correlation ID is taken from `X-Correlation-Id` when the caller sends
/// one, otherwise generated, so every log line of a request can be tied
/// together.
pub async fn context_middleware(mut request: Request<Body>, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get("X-Correlation-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let context = RequestContext::new().with_correlation_id(correlation_id);
    request.extensions_mut().insert(context);

    next.run(request).await
}

// =========================================================================
// Bearer Token Authentication Middleware
// =========================================================================

/// Extract and verify the `Authorization: Bearer` token, then load the user
/// it was issued for. A token for a user that no longer exists is rejected.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::MissingToken.into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::InvalidToken.into_response())?;

    // Verify signature and expiry
    let claims = auth::verify_token(token, &state.config.jwt_secret)
        .map_err(|e| e.into_response())?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::InvalidToken.into_response())?;

    // The token may outlive its user
    let user_record: Option<(Uuid, String, String)> = sqlx::query_as(
        "SELECT id, username, name FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await
    .map_err(|e| {
        tracing::error!("Database error during token validation: {}", e);
        AppError::Database(e).into_response()
    })?;

    let (id, username, name) = user_record.ok_or_else(|| AppError::InvalidToken.into_response())?;

    // Store authenticated user in request extensions
    request.extensions_mut().insert(AuthenticatedUser {
        id,
        username,
        name,
    });

    // Enrich the request context with the authenticated user
    let context = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default()
        .with_request_user(id);
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    // Mask sensitive headers
    let headers = mask_headers_for_logging(request.headers());

    let correlation_id = request
        .extensions()
        .get::<RequestContext>()
        .and_then(|ctx| ctx.correlation_id);

    let start = std::time::Instant::now();

    // Log request
    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        correlation_id = ?correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    // Process request
    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    // Log response
    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    response
}
