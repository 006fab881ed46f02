//! crates/library_assistant_core/src/scope.rs
//!
//! Decides which books a library question may see.
//!
//! Classification is an ordered rule table evaluated top to bottom; the first
//! rule whose predicate holds picks the mode. The order is part of the
//! contract: an administrator's personal question wins over a request for
//! recommendations.

use crate::domain::{Book, QueryContext, QueryMode, User};
use crate::ports::{BookCatalog, PortResult};
use tracing::info;
use uuid::Uuid;

const PERSONAL_KEYWORDS: [&str; 4] = ["my ", "me ", "mine", "myself"];

const RECOMMENDATION_KEYWORDS: [&str; 8] = [
    "recommend",
    "suggestion",
    "suggest",
    "what should i read",
    "what to read",
    "looking for",
    "similar to",
    "like",
];

/// Returned in place of a report when the resolved set is empty.
pub const NO_BOOKS_MESSAGE: &str = "No books found in the library.";

/// Returned in place of a report when no other user has books to recommend.
pub const NO_RECOMMENDATIONS_MESSAGE: &str =
    "No books from other users are available for recommendations.";

/// Whether the question is about the asker's own books.
pub fn is_personal_question(question: &str) -> bool {
    contains_any(question, &PERSONAL_KEYWORDS)
}

/// Whether the question asks for suggestions.
pub fn is_recommendation_question(question: &str) -> bool {
    contains_any(question, &RECOMMENDATION_KEYWORDS)
}

fn contains_any(question: &str, keywords: &[&str]) -> bool {
    let q = question.trim().to_lowercase();
    keywords.iter().any(|keyword| q.contains(keyword))
}

/// Which slice of the record store a mode reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookScope {
    OwnedBy(Uuid),
    NotOwnedBy(Uuid),
    Everything,
}

impl QueryMode {
    /// The books this mode may see when `principal` is asking.
    pub fn scope_for(&self, principal: &User) -> BookScope {
        match self {
            QueryMode::NormalUser | QueryMode::PersonalAdmin => BookScope::OwnedBy(principal.id),
            QueryMode::Recommendation => BookScope::NotOwnedBy(principal.id),
            QueryMode::NormalAdmin => BookScope::Everything,
        }
    }

    /// The text used instead of a report when the resolved set is empty.
    pub fn empty_message(&self) -> &'static str {
        match self {
            QueryMode::Recommendation => NO_RECOMMENDATIONS_MESSAGE,
            _ => NO_BOOKS_MESSAGE,
        }
    }
}

/// One entry of the classification table.
struct ScopeRule {
    mode: QueryMode,
    applies: fn(&User, &str) -> bool,
}

fn admin_personal(principal: &User, question: &str) -> bool {
    principal.is_admin && is_personal_question(question)
}

fn wants_recommendation(_: &User, question: &str) -> bool {
    is_recommendation_question(question)
}

fn is_admin(principal: &User, _: &str) -> bool {
    principal.is_admin
}

fn always(_: &User, _: &str) -> bool {
    true
}

const RULES: [ScopeRule; 4] = [
    ScopeRule { mode: QueryMode::PersonalAdmin, applies: admin_personal },
    ScopeRule { mode: QueryMode::Recommendation, applies: wants_recommendation },
    ScopeRule { mode: QueryMode::NormalAdmin, applies: is_admin },
    ScopeRule { mode: QueryMode::NormalUser, applies: always },
];

/// Picks the mode for a question. Pure: depends only on the text and the
/// principal's role.
pub fn classify(question: &str, principal: &User) -> QueryMode {
    RULES
        .iter()
        .find(|rule| (rule.applies)(principal, question))
        .map(|rule| rule.mode)
        .unwrap_or(QueryMode::NormalUser)
}

/// Reads the books covered by `scope`.
pub async fn fetch_scope<C>(catalog: &C, scope: BookScope) -> PortResult<Vec<Book>>
where
    C: BookCatalog + ?Sized,
{
    match scope {
        BookScope::OwnedBy(owner_id) => catalog.books_owned_by(owner_id).await,
        BookScope::NotOwnedBy(owner_id) => catalog.books_not_owned_by(owner_id).await,
        BookScope::Everything => catalog.all_books().await,
    }
}

/// Classifies the question and loads the books it may see.
pub async fn resolve<C>(catalog: &C, question: &str, principal: &User) -> PortResult<QueryContext>
where
    C: BookCatalog + ?Sized,
{
    let mode = classify(question, principal);
    let books = fetch_scope(catalog, mode.scope_for(principal)).await?;
    info!(
        "Resolved question from {} as {} with {} books in scope.",
        principal.username,
        mode,
        books.len()
    );

    Ok(QueryContext {
        question: question.to_string(),
        principal: principal.clone(),
        mode,
        books,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{book, user, InMemoryCatalog};

    #[test]
    fn personal_keywords_need_their_trailing_space() {
        assert!(is_personal_question("What are MY books"));
        assert!(is_personal_question("tell me about it"));
        assert!(is_personal_question("is this one mine"));
        assert!(!is_personal_question("how many books are there"));
        assert!(!is_personal_question("show me"));
    }

    #[test]
    fn recommendation_keywords_match_as_substrings() {
        assert!(is_recommendation_question("Any SUGGESTIONS?"));
        assert!(is_recommendation_question("What should I read next"));
        assert!(is_recommendation_question("I'd like a thriller"));
        assert!(!is_recommendation_question("How many books do I have?"));
    }

    #[test]
    fn admin_personal_signal_beats_recommendation() {
        let admin = user("root", true);
        assert_eq!(
            classify("recommend something like my favorite", &admin),
            QueryMode::PersonalAdmin
        );
    }

    #[test]
    fn personal_signal_is_ignored_for_ordinary_users() {
        let reader = user("alice", false);
        assert_eq!(classify("what are my books", &reader), QueryMode::NormalUser);
        assert_eq!(
            classify("recommend something like my favorite", &reader),
            QueryMode::Recommendation
        );
    }

    #[test]
    fn defaults_follow_role() {
        assert_eq!(classify("", &user("root", true)), QueryMode::NormalAdmin);
        assert_eq!(classify("", &user("alice", false)), QueryMode::NormalUser);
        assert_eq!(
            classify("how many books are there", &user("root", true)),
            QueryMode::NormalAdmin
        );
    }

    #[test]
    fn scopes_follow_mode() {
        let alice = user("alice", false);
        assert_eq!(QueryMode::NormalUser.scope_for(&alice), BookScope::OwnedBy(alice.id));
        assert_eq!(QueryMode::PersonalAdmin.scope_for(&alice), BookScope::OwnedBy(alice.id));
        assert_eq!(
            QueryMode::Recommendation.scope_for(&alice),
            BookScope::NotOwnedBy(alice.id)
        );
        assert_eq!(QueryMode::NormalAdmin.scope_for(&alice), BookScope::Everything);
    }

    #[tokio::test]
    async fn ordinary_user_sees_only_their_books() {
        let alice = user("alice", false);
        let bob = user("bob", false);
        let catalog = InMemoryCatalog::new(vec![
            book("Dune", "Science", &alice),
            book("Emma", "Romance", &bob),
        ]);

        let ctx = resolve(&catalog, "What books do I have?", &alice).await.unwrap();

        assert_eq!(ctx.mode, QueryMode::NormalUser);
        assert_eq!(ctx.books.len(), 1);
        assert_eq!(ctx.books[0].title, "Dune");
    }

    #[tokio::test]
    async fn recommendation_excludes_the_askers_books() {
        let alice = user("alice", false);
        let bob = user("bob", false);
        let catalog = InMemoryCatalog::new(vec![
            book("Gone Girl", "Mystery", &alice),
            book("In the Woods", "Mystery", &alice),
            book("The Firm", "Thriller", &bob),
        ]);

        let ctx = resolve(&catalog, "can you recommend something like a mystery novel", &alice)
            .await
            .unwrap();

        assert_eq!(ctx.mode, QueryMode::Recommendation);
        assert_eq!(ctx.books.len(), 1);
        assert_eq!(ctx.books[0].title, "The Firm");
        assert!(ctx.books.iter().all(|b| b.owner_id != alice.id));
    }

    #[tokio::test]
    async fn admin_sees_everything_by_default() {
        let admin = user("root", true);
        let alice = user("alice", false);
        let bob = user("bob", false);
        let catalog = InMemoryCatalog::new(vec![
            book("A", "Fiction", &alice),
            book("B", "Fiction", &bob),
        ]);

        let ctx = resolve(&catalog, "how many books are there", &admin).await.unwrap();

        assert_eq!(ctx.mode, QueryMode::NormalAdmin);
        assert_eq!(ctx.books.len(), 2);
    }

    #[tokio::test]
    async fn admin_personal_question_with_no_books_is_empty() {
        let admin = user("root", true);
        let alice = user("alice", false);
        let catalog = InMemoryCatalog::new(vec![book("A", "Fiction", &alice)]);

        let ctx = resolve(&catalog, "what are my books", &admin).await.unwrap();

        assert_eq!(ctx.mode, QueryMode::PersonalAdmin);
        assert!(ctx.books.is_empty());
        assert_eq!(ctx.mode.empty_message(), NO_BOOKS_MESSAGE);
    }

    #[tokio::test]
    async fn resolving_twice_gives_the_same_result() {
        let alice = user("alice", false);
        let bob = user("bob", false);
        let catalog = InMemoryCatalog::new(vec![
            book("A", "Fiction", &alice),
            book("B", "History", &bob),
            book("C", "Fantasy", &bob),
        ]);

        let first = resolve(&catalog, "suggest a book", &alice).await.unwrap();
        let second = resolve(&catalog, "suggest a book", &alice).await.unwrap();

        assert_eq!(first.mode, second.mode);
        assert_eq!(first.books, second.books);
    }
}
