//! services/api/src/web/books.rs
//!
//! CRUD endpoints for a user's library. Owners manage their own books;
//! administrators may manage anyone's.

use crate::web::{
    forms::validate_book,
    rest::{port_error_response, BookResponse, MessageResponse},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use library_assistant_core::domain::{Book, BookDraft, User};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// The book form. `status` defaults to "To Read".
#[derive(Deserialize, ToSchema)]
pub struct BookRequest {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: Option<String>,
    pub price: Option<f64>,
}

impl BookRequest {
    fn validate(&self) -> Result<BookDraft, (StatusCode, String)> {
        validate_book(
            &self.title,
            &self.author,
            &self.genre,
            self.status.as_deref(),
            self.price,
        )
        .map_err(|errors| (StatusCode::UNPROCESSABLE_ENTITY, errors.to_string()))
    }
}

/// Owners and administrators may touch a book; everyone else gets 403.
pub fn ensure_can_manage(book: &Book, user: &User) -> Result<(), (StatusCode, String)> {
    if book.owner_id == user.id || user.is_admin {
        Ok(())
    } else {
        warn!("User {} denied access to book {}.", user.username, book.id);
        Err((StatusCode::FORBIDDEN, "Forbidden".to_string()))
    }
}

async fn load_managed_book(
    state: &AppState,
    book_id: Uuid,
    user: &User,
) -> Result<Book, (StatusCode, String)> {
    let book = state
        .db
        .get_book(book_id)
        .await
        .map_err(|e| port_error_response("Failed to load book", e))?;
    ensure_can_manage(&book, user)?;
    Ok(book)
}

/// GET /books - The caller's books, newest first
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "The caller's books", body = [BookResponse]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_books_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let books = state
        .db
        .list_books_for_owner(user.id)
        .await
        .map_err(|e| port_error_response("Failed to load books", e))?;
    let body: Vec<BookResponse> = books.into_iter().map(BookResponse::from).collect();
    Ok(Json(body))
}

/// POST /books - Add a book to the caller's library
#[utoipa::path(
    post,
    path = "/books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book added", body = BookResponse),
        (status = 422, description = "Invalid book details")
    )
)]
pub async fn create_book_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(req): Json<BookRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let draft = req.validate()?;
    let book = state
        .db
        .create_book(user.id, &draft)
        .await
        .map_err(|e| port_error_response("Failed to add book", e))?;
    info!("\"{}\" has been added to {}'s library.", book.title, user.username);
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// GET /books/{id} - A single book
#[utoipa::path(
    get,
    path = "/books/{id}",
    params(("id" = Uuid, Path, description = "The book ID")),
    responses(
        (status = 200, description = "The book", body = BookResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such book")
    )
)]
pub async fn get_book_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(book_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let book = load_managed_book(&state, book_id, &user).await?;
    Ok(Json(BookResponse::from(book)))
}

/// PUT /books/{id} - Edit a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    params(("id" = Uuid, Path, description = "The book ID")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such book"),
        (status = 422, description = "Invalid book details")
    )
)]
pub async fn update_book_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<BookRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    load_managed_book(&state, book_id, &user).await?;
    let draft = req.validate()?;
    let book = state
        .db
        .update_book(book_id, &draft)
        .await
        .map_err(|e| port_error_response("Failed to update book", e))?;
    info!("\"{}\" has been updated by {}.", book.title, user.username);
    Ok(Json(BookResponse::from(book)))
}

/// DELETE /books/{id} - Remove a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    params(("id" = Uuid, Path, description = "The book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No such book")
    )
)]
pub async fn delete_book_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(book_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let book = load_managed_book(&state, book_id, &user).await?;
    state
        .db
        .delete_book(book_id)
        .await
        .map_err(|e| port_error_response("Failed to delete book", e))?;
    Ok(Json(MessageResponse::new(format!(
        "\"{}\" has been deleted from the library!",
        book.title
    ))))
}
