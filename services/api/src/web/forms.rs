//! services/api/src/web/forms.rs
//!
//! Field validation for the registration, login, book and user-edit payloads.
//! Uniqueness checks need the database and live in the handlers.

use library_assistant_core::domain::{BookDraft, BookStatus, UserUpdate, GENRES};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const REQUIRED: &str = "This field is required.";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email regex is valid"))
}

/// Validation failures, keyed by field name, in the order they were found.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors(Vec<(&'static str, String)>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    /// `Ok(value)` when no errors were recorded.
    pub fn or_ok<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&lines.join("; "))
    }
}

fn check_username(errors: &mut FormErrors, username: &str) {
    let len = username.chars().count();
    if len == 0 {
        errors.add("username", REQUIRED);
    } else if !(2..=20).contains(&len) {
        errors.add("username", "Field must be between 2 and 20 characters long.");
    }
}

fn check_email(errors: &mut FormErrors, email: &str) {
    if email.is_empty() {
        errors.add("email", REQUIRED);
    } else if !email_regex().is_match(email) {
        errors.add("email", "Invalid email address.");
    }
}

/// A new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Registration, FormErrors> {
    let mut errors = FormErrors::default();
    let username = username.trim();
    let email = email.trim();
    check_username(&mut errors, username);
    check_email(&mut errors, email);
    if password.is_empty() {
        errors.add("password", REQUIRED);
    }
    if confirm_password.is_empty() {
        errors.add("confirm_password", REQUIRED);
    } else if confirm_password != password {
        errors.add("confirm_password", "Field must be equal to password.");
    }
    errors.or_ok(Registration {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();
    check_email(&mut errors, email.trim());
    if password.is_empty() {
        errors.add("password", REQUIRED);
    }
    errors.or_ok(())
}

pub fn validate_book(
    title: &str,
    author: &str,
    genre: &str,
    status: Option<&str>,
    price: Option<f64>,
) -> Result<BookDraft, FormErrors> {
    let mut errors = FormErrors::default();
    let title = title.trim();
    let author = author.trim();

    if title.is_empty() {
        errors.add("title", REQUIRED);
    }
    if author.is_empty() {
        errors.add("author", REQUIRED);
    }
    if genre.is_empty() {
        errors.add("genre", REQUIRED);
    } else if !GENRES.contains(&genre) {
        errors.add("genre", "Not a valid choice.");
    }

    let status = match status {
        None => BookStatus::default(),
        Some(raw) => raw.parse::<BookStatus>().unwrap_or_else(|_| {
            errors.add("status", "Not a valid choice.");
            BookStatus::default()
        }),
    };

    // A zero price counts as missing, like any other empty required field.
    let price = match price {
        None => {
            errors.add("price", REQUIRED);
            0.0
        }
        Some(p) if p == 0.0 => {
            errors.add("price", REQUIRED);
            0.0
        }
        Some(p) if !p.is_finite() || p < 0.0 => {
            errors.add("price", "Number must be at least 0.");
            0.0
        }
        Some(p) => (p * 100.0).round() / 100.0,
    };

    errors.or_ok(BookDraft {
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        status,
        price,
    })
}

pub fn validate_user_edit(username: &str, email: &str, is_admin: bool) -> Result<UserUpdate, FormErrors> {
    let mut errors = FormErrors::default();
    let username = username.trim();
    let email = email.trim();
    check_username(&mut errors, username);
    check_email(&mut errors, email);
    errors.or_ok(UserUpdate {
        username: username.to_string(),
        email: email.to_string(),
        is_admin,
    })
}
