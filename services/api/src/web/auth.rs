//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration, login, and logout.

use crate::web::{
    forms::{validate_login, validate_registration, FormErrors},
    middleware::{session_id_from_headers, SESSION_COOKIE},
    rest::{port_error_response, MessageResponse, UserResponse},
    state::AppState,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use library_assistant_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

const LOGIN_FAILED: &str = "Login Unsuccessful. Please check email and password!";

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

//=========================================================================================
// Cookie Helpers
//=========================================================================================

/// Builds the auth cookie. Without `max_age` it lasts for the browser session.
pub fn session_cookie(session_id: &str, max_age: Option<Duration>) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/",
        SESSION_COOKIE, session_id
    );
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age.num_seconds()));
    }
    cookie
}

pub fn cleared_session_cookie() -> String {
    format!("{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

fn invalid_form(errors: FormErrors) -> (StatusCode, String) {
    (StatusCode::UNPROCESSABLE_ENTITY, errors.to_string())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Your account has been created! You are now able to log in.", body = UserResponse),
        (status = 422, description = "Invalid or already-used details"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Validate the fields
    let registration =
        validate_registration(&req.username, &req.email, &req.password, &req.confirm_password)
            .map_err(invalid_form)?;

    // 2. Check the username and email are free
    let mut errors = FormErrors::default();
    let username_taken = state
        .db
        .username_exists(&registration.username)
        .await
        .map_err(|e| port_error_response("Failed to create user", e))?;
    if username_taken {
        errors.add("username", "That username is taken.");
    }
    let email_taken = state
        .db
        .email_exists(&registration.email)
        .await
        .map_err(|e| port_error_response("Failed to create user", e))?;
    if email_taken {
        errors.add("email", "That email is taken.");
    }
    errors.or_ok(()).map_err(invalid_form)?;

    // 3. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(registration.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password".to_string())
        })?
        .to_string();

    // 4. Create user in database (never an administrator)
    let user = state
        .db
        .create_user(&registration.username, &registration.email, &password_hash)
        .await
        .map_err(|e| port_error_response("Failed to create user", e))?;
    info!("Registered user {}.", user.username);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Missing or malformed fields"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    validate_login(&req.email, &req.password).map_err(invalid_form)?;

    // 1. Get user by email
    let creds = state
        .db
        .get_user_by_email(req.email.trim())
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => (StatusCode::UNAUTHORIZED, LOGIN_FAILED.to_string()),
            other => port_error_response("Authentication error", other),
        })?;

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Authentication error".to_string())
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err((StatusCode::UNAUTHORIZED, LOGIN_FAILED.to_string()));
    }

    // 3. Create the auth session
    let auth_session_id = Uuid::new_v4().to_string();
    let ttl = Duration::days(state.config.session_ttl_days);
    state
        .db
        .create_auth_session(&auth_session_id, creds.user.id, Utc::now() + ttl)
        .await
        .map_err(|e| port_error_response("Failed to create session", e))?;
    info!("User {} logged in.", creds.user.username);

    // 4. Return response with cookie; only "remember me" outlives the browser session
    let cookie = session_cookie(&auth_session_id, req.remember.then_some(ttl));
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(creds.user)),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Some(auth_session_id) = session_id_from_headers(&headers) {
        state
            .db
            .delete_auth_session(auth_session_id)
            .await
            .map_err(|e| port_error_response("Failed to logout", e))?;
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cleared_session_cookie())],
        Json(MessageResponse::new("You have been logged out.")),
    ))
}
