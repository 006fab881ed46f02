//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `BookCatalog` and `DatabaseService` ports from the `core` crate. It handles
//! all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use library_assistant_core::domain::{Book, BookDraft, BookStatus, User, UserCredentials, UserUpdate};
use library_assistant_core::ports::{BookCatalog, DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const BOOK_COLUMNS: &str = "SELECT b.id, b.title, b.author, b.genre, b.status, b.price, \
     b.user_id, u.username AS owner_name, b.date_added \
     FROM books b JOIN users u ON u.id = b.user_id";

const USER_COLUMNS: &str = "SELECT id, username, email, is_admin FROM users";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn fetch_books(&self, sql: String, owner_id: Option<Uuid>) -> PortResult<Vec<Book>> {
        let mut query = sqlx::query_as::<_, BookRecord>(&sql);
        if let Some(owner_id) = owner_id {
            query = query.bind(owner_id);
        }
        let records = query.fetch_all(&self.pool).await.map_err(unexpected)?;
        records.into_iter().map(BookRecord::to_domain).collect()
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Maps a missing row to `NotFound` and a unique-constraint hit to `Conflict`.
fn lookup_err(what: String) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            PortError::Conflict(db.message().to_string())
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    email: String,
    is_admin: bool,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            is_admin: self.is_admin,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    #[sqlx(flatten)]
    user: UserRecord,
    password_hash: String,
}

#[derive(FromRow)]
struct BookRecord {
    id: Uuid,
    title: String,
    author: String,
    genre: String,
    status: String,
    price: f64,
    user_id: Uuid,
    owner_name: String,
    date_added: DateTime<Utc>,
}
impl BookRecord {
    fn to_domain(self) -> PortResult<Book> {
        let status = self
            .status
            .parse::<BookStatus>()
            .map_err(PortError::Unexpected)?;
        Ok(Book {
            id: self.id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            status,
            price: self.price,
            owner_id: self.user_id,
            owner_name: self.owner_name,
            date_added: self.date_added,
        })
    }
}

//=========================================================================================
// `BookCatalog` Trait Implementation
//=========================================================================================

#[async_trait]
impl BookCatalog for DbAdapter {
    async fn all_books(&self) -> PortResult<Vec<Book>> {
        self.fetch_books(format!("{} ORDER BY b.date_added ASC, b.id ASC", BOOK_COLUMNS), None)
            .await
    }

    async fn books_owned_by(&self, owner_id: Uuid) -> PortResult<Vec<Book>> {
        self.fetch_books(
            format!("{} WHERE b.user_id = $1 ORDER BY b.date_added ASC, b.id ASC", BOOK_COLUMNS),
            Some(owner_id),
        )
        .await
    }

    async fn books_not_owned_by(&self, owner_id: Uuid) -> PortResult<Vec<Book>> {
        self.fetch_books(
            format!("{} WHERE b.user_id <> $1 ORDER BY b.date_added ASC, b.id ASC", BOOK_COLUMNS),
            Some(owner_id),
        )
        .await
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, username, email, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4, FALSE) RETURNING id, username, email, is_admin",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(lookup_err(format!("User {}", username)))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!("{} WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(lookup_err(format!("User {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, username, email, is_admin, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(lookup_err(format!("User with email {} not found", email)))?;
        Ok(UserCredentials {
            user: record.user.to_domain(),
            hashed_password: record.password_hash,
        })
    }

    async fn username_exists(&self, username: &str) -> PortResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn email_exists(&self, email: &str) -> PortResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "{} ORDER BY created_at ASC, id ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_user(&self, user_id: Uuid, update: &UserUpdate) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "UPDATE users SET username = $1, email = $2, is_admin = $3 WHERE id = $4 \
             RETURNING id, username, email, is_admin",
        )
        .bind(&update.username)
        .bind(&update.email)
        .bind(update.is_admin)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(lookup_err(format!("User {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn create_book(&self, owner_id: Uuid, draft: &BookDraft) -> PortResult<Book> {
        let book_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO books (id, title, author, genre, status, price, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(book_id)
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(&draft.genre)
        .bind(draft.status.as_str())
        .bind(draft.price)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        self.get_book(book_id).await
    }

    async fn get_book(&self, book_id: Uuid) -> PortResult<Book> {
        let record = sqlx::query_as::<_, BookRecord>(&format!("{} WHERE b.id = $1", BOOK_COLUMNS))
            .bind(book_id)
            .fetch_one(&self.pool)
            .await
            .map_err(lookup_err(format!("Book {} not found", book_id)))?;
        record.to_domain()
    }

    async fn update_book(&self, book_id: Uuid, draft: &BookDraft) -> PortResult<Book> {
        let result = sqlx::query(
            "UPDATE books SET title = $1, author = $2, genre = $3, status = $4, price = $5 \
             WHERE id = $6",
        )
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(&draft.genre)
        .bind(draft.status.as_str())
        .bind(draft.price)
        .bind(book_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Book {} not found", book_id)));
        }
        self.get_book(book_id).await
    }

    async fn delete_book(&self, book_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Book {} not found", book_id)));
        }
        Ok(())
    }

    async fn list_books_for_owner(&self, owner_id: Uuid) -> PortResult<Vec<Book>> {
        self.fetch_books(
            format!("{} WHERE b.user_id = $1 ORDER BY b.date_added DESC, b.id DESC", BOOK_COLUMNS),
            Some(owner_id),
        )
        .await
    }
}
