//! services/api/src/web/rest.rs
//!
//! Contains the shared REST payloads, the mapping from port errors to HTTP
//! responses, and the master definition for the OpenAPI specification.

use crate::web::{admin, ask, auth, books};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use library_assistant_core::domain::{Book, User};
use library_assistant_core::ports::PortError;
use serde::Serialize;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        books::list_books_handler,
        books::create_book_handler,
        books::get_book_handler,
        books::update_book_handler,
        books::delete_book_handler,
        admin::dashboard_handler,
        admin::edit_user_handler,
        admin::delete_user_handler,
        ask::ai_query_handler,
    ),
    components(
        schemas(
            UserResponse,
            BookResponse,
            MessageResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            books::BookRequest,
            admin::AdminDashboard,
            admin::UserEditRequest,
            ask::AiQueryRequest,
            ask::AiQueryResponse,
        )
    ),
    tags(
        (name = "Library Assistant API", description = "Personal library management with an AI question-answering assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A user account as returned by the API.
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// A book record as returned by the API.
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: String,
    pub price: f64,
    pub owner_id: Uuid,
    pub owner: String,
    pub date_added: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            genre: book.genre,
            status: book.status.to_string(),
            price: book.price,
            owner_id: book.owner_id,
            owner: book.owner_name,
            date_added: book.date_added,
        }
    }
}

/// A plain confirmation message.
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Converts a port failure into the status and message returned to the client.
pub fn port_error_response(context: &str, e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, what),
        PortError::Conflict(what) => (StatusCode::CONFLICT, what),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(detail) => {
            error!("{}: {}", context, detail);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}
