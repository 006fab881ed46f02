// Test doubles for the core ports.

use crate::domain::{Book, BookStatus, User};
use crate::ports::{BookCatalog, CompletionError, CompletionService, PortResult};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Mutex;
use uuid::Uuid;

pub fn user(username: &str, is_admin: bool) -> User {
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{}@example.org", username),
        is_admin,
    }
}

pub fn book(title: &str, genre: &str, owner: &User) -> Book {
    priced_book(title, genre, BookStatus::ToRead, 10.0, owner)
}

pub fn priced_book(
    title: &str,
    genre: &str,
    status: BookStatus,
    price: f64,
    owner: &User,
) -> Book {
    Book {
        id: Uuid::new_v4(),
        title: title.to_string(),
        author: format!("Author of {}", title),
        genre: genre.to_string(),
        status,
        price,
        owner_id: owner.id,
        owner_name: owner.username.clone(),
        date_added: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// A catalog backed by a vector, returning books in insertion order.
pub struct InMemoryCatalog {
    books: Vec<Book>,
}

impl InMemoryCatalog {
    pub fn new(books: Vec<Book>) -> Self {
        let books = books
            .into_iter()
            .enumerate()
            .map(|(i, mut b)| {
                b.date_added += Duration::minutes(i as i64);
                b
            })
            .collect();
        Self { books }
    }
}

#[async_trait]
impl BookCatalog for InMemoryCatalog {
    async fn all_books(&self) -> PortResult<Vec<Book>> {
        Ok(self.books.clone())
    }

    async fn books_owned_by(&self, owner_id: Uuid) -> PortResult<Vec<Book>> {
        Ok(self.books.iter().filter(|b| b.owner_id == owner_id).cloned().collect())
    }

    async fn books_not_owned_by(&self, owner_id: Uuid) -> PortResult<Vec<Book>> {
        Ok(self.books.iter().filter(|b| b.owner_id != owner_id).cloned().collect())
    }
}

/// Arguments captured from a completion call
#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub system_instruction: String,
    pub user_message: String,
}

/// A completion service that returns a fixed outcome and records its calls.
pub struct ScriptedCompletion {
    outcome: Result<String, CompletionError>,
    calls: Mutex<Vec<CompletionCall>>,
}

impl ScriptedCompletion {
    pub fn answering(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CompletionError) -> Self {
        Self {
            outcome: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(CompletionCall {
            system_instruction: system_instruction.to_string(),
            user_message: user_message.to_string(),
        });
        self.outcome.clone()
    }
}
