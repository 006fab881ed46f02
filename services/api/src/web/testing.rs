// In-memory implementations of the ports for router tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use library_assistant_core::domain::{Book, BookDraft, User, UserCredentials, UserUpdate};
use library_assistant_core::ports::{
    BookCatalog, CompletionError, CompletionService, DatabaseService, PortError, PortResult,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    books: Vec<Book>,
    sessions: Vec<(String, Uuid, DateTime<Utc>)>,
}

#[derive(Default)]
pub struct InMemoryDb {
    tables: Mutex<Tables>,
    users_unavailable: AtomicBool,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user with a live auth session and returns both.
    pub fn seed_user(&self, username: &str, is_admin: bool) -> (User, String) {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.org", username),
            is_admin,
        };
        let session_id = Uuid::new_v4().to_string();
        let mut tables = self.tables.lock().unwrap();
        tables.users.push(UserCredentials {
            user: user.clone(),
            hashed_password: String::new(),
        });
        tables
            .sessions
            .push((session_id.clone(), user.id, Utc::now() + Duration::days(1)));
        (user, session_id)
    }

    pub fn seed_book(&self, owner: &User, title: &str, genre: &str) -> Book {
        let mut tables = self.tables.lock().unwrap();
        let book = Book {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: "Anon".to_string(),
            genre: genre.to_string(),
            status: Default::default(),
            price: 5.0,
            owner_id: owner.id,
            owner_name: owner.username.clone(),
            date_added: Utc::now() + Duration::seconds(tables.books.len() as i64),
        };
        tables.books.push(book.clone());
        book
    }

    /// Makes every subsequent user lookup fail as a store outage would.
    pub fn break_user_lookups(&self) {
        self.users_unavailable.store(true, Ordering::SeqCst);
    }

    pub fn book_count(&self) -> usize {
        self.tables.lock().unwrap().books.len()
    }
}

#[async_trait]
impl BookCatalog for InMemoryDb {
    async fn all_books(&self) -> PortResult<Vec<Book>> {
        Ok(self.tables.lock().unwrap().books.clone())
    }

    async fn books_owned_by(&self, owner_id: Uuid) -> PortResult<Vec<Book>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.books.iter().filter(|b| b.owner_id == owner_id).cloned().collect())
    }

    async fn books_not_owned_by(&self, owner_id: Uuid) -> PortResult<Vec<Book>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.books.iter().filter(|b| b.owner_id != owner_id).cloned().collect())
    }
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .users
            .iter()
            .any(|c| c.user.username == username || c.user.email == email)
        {
            return Err(PortError::Conflict(format!("User {}", username)));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            is_admin: false,
        };
        tables.users.push(UserCredentials {
            user: user.clone(),
            hashed_password: hashed_password.to_string(),
        });
        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        if self.users_unavailable.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("connection refused".to_string()));
        }
        let tables = self.tables.lock().unwrap();
        tables
            .users
            .iter()
            .find(|c| c.user.id == user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.lock().unwrap();
        tables
            .users
            .iter()
            .find(|c| c.user.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User with email {} not found", email)))
    }

    async fn username_exists(&self, username: &str) -> PortResult<bool> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().any(|c| c.user.username == username))
    }

    async fn email_exists(&self, email: &str) -> PortResult<bool> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().any(|c| c.user.email == email))
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().map(|c| c.user.clone()).collect())
    }

    async fn update_user(&self, user_id: Uuid, update: &UserUpdate) -> PortResult<User> {
        let mut tables = self.tables.lock().unwrap();
        let creds = tables
            .users
            .iter_mut()
            .find(|c| c.user.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        creds.user.username = update.username.clone();
        creds.user.email = update.email.clone();
        creds.user.is_admin = update.is_admin;
        Ok(creds.user.clone())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.users.retain(|c| c.user.id != user_id);
        tables.books.retain(|b| b.owner_id != user_id);
        tables.sessions.retain(|(_, owner, _)| *owner != user_id);
        Ok(())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.sessions.push((session_id.to_string(), user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let tables = self.tables.lock().unwrap();
        tables
            .sessions
            .iter()
            .find(|(id, _, expires_at)| id == session_id && *expires_at > Utc::now())
            .map(|(_, user_id, _)| *user_id)
            .ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.sessions.retain(|(id, _, _)| id != session_id);
        Ok(())
    }

    async fn create_book(&self, owner_id: Uuid, draft: &BookDraft) -> PortResult<Book> {
        let owner = self.get_user_by_id(owner_id).await?;
        let mut tables = self.tables.lock().unwrap();
        let book = Book {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            author: draft.author.clone(),
            genre: draft.genre.clone(),
            status: draft.status,
            price: draft.price,
            owner_id,
            owner_name: owner.username,
            date_added: Utc::now() + Duration::seconds(tables.books.len() as i64),
        };
        tables.books.push(book.clone());
        Ok(book)
    }

    async fn get_book(&self, book_id: Uuid) -> PortResult<Book> {
        let tables = self.tables.lock().unwrap();
        tables
            .books
            .iter()
            .find(|b| b.id == book_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Book {} not found", book_id)))
    }

    async fn update_book(&self, book_id: Uuid, draft: &BookDraft) -> PortResult<Book> {
        let mut tables = self.tables.lock().unwrap();
        let book = tables
            .books
            .iter_mut()
            .find(|b| b.id == book_id)
            .ok_or_else(|| PortError::NotFound(format!("Book {} not found", book_id)))?;
        book.title = draft.title.clone();
        book.author = draft.author.clone();
        book.genre = draft.genre.clone();
        book.status = draft.status;
        book.price = draft.price;
        Ok(book.clone())
    }

    async fn delete_book(&self, book_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.books.retain(|b| b.id != book_id);
        Ok(())
    }

    async fn list_books_for_owner(&self, owner_id: Uuid) -> PortResult<Vec<Book>> {
        let mut books = self.books_owned_by(owner_id).await?;
        books.reverse();
        Ok(books)
    }
}

/// A completion service with a fixed outcome.
pub struct FixedCompletion(pub Result<String, CompletionError>);

#[async_trait]
impl CompletionService for FixedCompletion {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        self.0.clone()
    }
}
