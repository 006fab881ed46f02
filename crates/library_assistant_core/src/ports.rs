//! crates/library_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::domain::{Book, BookDraft, User, UserCredentials, UserUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Why a call to the completion service failed.
///
/// Each variant displays as the bare failure detail so it can be embedded in
/// a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// The service could not be reached or the connection broke.
    #[error("{0}")]
    Transport(String),
    /// The request did not complete in time.
    #[error("{0}")]
    Timeout(String),
    /// The service answered with an error (bad key, quota, rate limit, ...).
    #[error("{0}")]
    Rejected(String),
    /// The service answered but produced no text.
    #[error("{0}")]
    EmptyResponse(String),
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Read-only access to book records, scoped by owner.
///
/// The query resolver only ever needs these three reads. Implementations must
/// return books in a stable order (oldest first) so reports are reproducible.
#[async_trait]
pub trait BookCatalog: Send + Sync {
    async fn all_books(&self) -> PortResult<Vec<Book>>;

    async fn books_owned_by(&self, owner_id: Uuid) -> PortResult<Vec<Book>>;

    async fn books_not_owned_by(&self, owner_id: Uuid) -> PortResult<Vec<Book>>;
}

#[async_trait]
pub trait DatabaseService: BookCatalog {
    // --- User Management ---
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn username_exists(&self, username: &str) -> PortResult<bool>;

    async fn email_exists(&self, email: &str) -> PortResult<bool>;

    async fn list_users(&self) -> PortResult<Vec<User>>;

    async fn update_user(&self, user_id: Uuid, update: &UserUpdate) -> PortResult<User>;

    /// Deletes the user together with every book they own.
    async fn delete_user(&self, user_id: Uuid) -> PortResult<()>;

    // --- Auth Methods ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Book Management ---
    async fn create_book(&self, owner_id: Uuid, draft: &BookDraft) -> PortResult<Book>;

    async fn get_book(&self, book_id: Uuid) -> PortResult<Book>;

    async fn update_book(&self, book_id: Uuid, draft: &BookDraft) -> PortResult<Book>;

    async fn delete_book(&self, book_id: Uuid) -> PortResult<()>;

    /// The owner's books, newest first, for the library page.
    async fn list_books_for_owner(&self, owner_id: Uuid) -> PortResult<Vec<Book>>;
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends a system instruction and a user message, returning the generated text.
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, CompletionError>;
}
