//! crates/library_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The genres a book may be filed under.
pub const GENRES: [&str; 11] = [
    "Fiction",
    "Non-Fiction",
    "Science",
    "History",
    "Biography",
    "Fantasy",
    "Mystery",
    "Romance",
    "Thriller",
    "Self-Help",
    "Other",
];

// Represents a user - used throughout the app as the requesting principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub hashed_password: String,
}

/// Reading progress of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookStatus {
    #[default]
    ToRead,
    Reading,
    Completed,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [BookStatus::ToRead, BookStatus::Reading, BookStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::ToRead => "To Read",
            BookStatus::Reading => "Reading",
            BookStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("'{}' is not a valid book status", s))
    }
}

/// A book record as stored in a user's library.
///
/// The owner's display name travels with the record so that reports can be
/// rendered without a second lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: BookStatus,
    pub price: f64,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub date_added: DateTime<Utc>,
}

/// The editable fields of a book, as submitted by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: BookStatus,
    pub price: f64,
}

/// The fields an administrator may change on another account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

/// How a question is scoped against the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// An ordinary user asking about their own books.
    NormalUser,
    /// An administrator asking about the whole library.
    NormalAdmin,
    /// An administrator asking about their own books.
    PersonalAdmin,
    /// Anyone asking for suggestions from other users' books.
    Recommendation,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::NormalUser => "normal_user",
            QueryMode::NormalAdmin => "normal_admin",
            QueryMode::PersonalAdmin => "personal_admin",
            QueryMode::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request-scoped result of resolving a question: who asked, in which
/// mode, and the books the answer may draw on.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub question: String,
    pub principal: User,
    pub mode: QueryMode,
    pub books: Vec<Book>,
}
