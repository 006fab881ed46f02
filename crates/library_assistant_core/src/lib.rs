pub mod assistant;
pub mod domain;
pub mod ports;
pub mod scope;
pub mod summary;

#[cfg(test)]
mod testing;

pub use assistant::{answer_question, apology, ask_ai, Answer};
pub use domain::{
    Book, BookDraft, BookStatus, QueryContext, QueryMode, User, UserCredentials, UserUpdate,
    GENRES,
};
pub use ports::{
    BookCatalog, CompletionError, CompletionService, DatabaseService, PortError, PortResult,
};
pub use scope::{classify, resolve, BookScope};
pub use summary::{library_data, summarize};
