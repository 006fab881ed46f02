//! services/api/src/web/admin.rs
//!
//! Administrator endpoints: the dashboard plus editing and deleting accounts.
//! All routes here sit behind `require_auth` and `require_admin`.

use crate::web::{
    forms::{validate_user_edit, FormErrors},
    rest::{port_error_response, BookResponse, MessageResponse, UserResponse},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use library_assistant_core::{domain::User, ports::BookCatalog};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct AdminDashboard {
    pub users: Vec<UserResponse>,
    pub books: Vec<BookResponse>,
}

#[derive(Deserialize, ToSchema)]
pub struct UserEditRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// GET /admin - Every user and every book
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "All users and books", body = AdminDashboard),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let users = state
        .db
        .list_users()
        .await
        .map_err(|e| port_error_response("Failed to load users", e))?;
    let books = state
        .db
        .all_books()
        .await
        .map_err(|e| port_error_response("Failed to load books", e))?;

    Ok(Json(AdminDashboard {
        users: users.into_iter().map(UserResponse::from).collect(),
        books: books.into_iter().map(BookResponse::from).collect(),
    }))
}

/// PUT /admin/users/{id} - Edit an account
///
/// Username and email are only checked for uniqueness when they change. An
/// administrator's own admin flag cannot be changed here.
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "The user ID")),
    request_body = UserEditRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "No such user"),
        (status = 422, description = "Invalid or already-used details")
    )
)]
pub async fn edit_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<User>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UserEditRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let target = state
        .db
        .get_user_by_id(user_id)
        .await
        .map_err(|e| port_error_response("Failed to load user", e))?;

    let mut update = validate_user_edit(&req.username, &req.email, req.is_admin)
        .map_err(|errors| (StatusCode::UNPROCESSABLE_ENTITY, errors.to_string()))?;

    let mut errors = FormErrors::default();
    if update.username != target.username {
        let taken = state
            .db
            .username_exists(&update.username)
            .await
            .map_err(|e| port_error_response("Failed to update user", e))?;
        if taken {
            errors.add("username", "That username is already taken.");
        }
    }
    if update.email != target.email {
        let taken = state
            .db
            .email_exists(&update.email)
            .await
            .map_err(|e| port_error_response("Failed to update user", e))?;
        if taken {
            errors.add("email", "That email is already taken.");
        }
    }
    errors
        .or_ok(())
        .map_err(|errors| (StatusCode::UNPROCESSABLE_ENTITY, errors.to_string()))?;

    if target.id == admin.id {
        update.is_admin = target.is_admin;
    }

    let user = state
        .db
        .update_user(user_id, &update)
        .await
        .map_err(|e| port_error_response("Failed to update user", e))?;
    info!("User {} has been updated by {}.", user.username, admin.username);
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /admin/users/{id} - Delete an account and its books
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "The user ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Attempted to delete yourself"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<User>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let target = state
        .db
        .get_user_by_id(user_id)
        .await
        .map_err(|e| port_error_response("Failed to load user", e))?;

    if target.id == admin.id {
        return Err((StatusCode::BAD_REQUEST, "You cannot delete yourself!".to_string()));
    }

    state
        .db
        .delete_user(user_id)
        .await
        .map_err(|e| port_error_response("Failed to delete user", e))?;
    info!("User {} has been deleted by {}.", target.username, admin.username);
    Ok(Json(MessageResponse::new(format!(
        "User {} has been deleted!",
        target.username
    ))))
}
