//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};
use library_assistant_core::domain::User;
use library_assistant_core::ports::PortError;
use std::sync::Arc;
use tracing::warn;

use crate::web::{rest::port_error_response, state::AppState};

/// Name of the cookie carrying the auth session ID.
pub const SESSION_COOKIE: &str = "session";

/// Extracts the auth session ID from the request's `Cookie` header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
}

/// An unknown or expired session is 401; a store failure is a server fault.
fn session_failure(context: &str, e: PortError) -> StatusCode {
    match e {
        PortError::Unauthorized | PortError::NotFound(_) => {
            warn!("{}: {}", context, e);
            StatusCode::UNAUTHORIZED
        }
        other => port_error_response(context, other).0,
    }
}

/// Middleware that validates the auth session cookie and loads the requesting user.
///
/// If valid, inserts the `User` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Parse session ID from cookie
    let auth_session_id = session_id_from_headers(req.headers())
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    // 2. Validate auth session in database, get user_id
    let user_id = state
        .db
        .validate_auth_session(&auth_session_id)
        .await
        .map_err(|e| session_failure("Rejected auth session", e))?;

    // 3. Load the principal
    let user = state
        .db
        .get_user_by_id(user_id)
        .await
        .map_err(|e| session_failure("Failed to load the session's user", e))?;

    // 4. Insert the user into request extensions and continue to the handler
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Middleware for administrator-only routes. Must run after `require_auth`.
pub async fn require_admin(
    Extension(user): Extension<User>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if !user.is_admin {
        warn!("User {} attempted to reach an admin route.", user.username);
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(req).await)
}
