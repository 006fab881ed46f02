//! crates/library_assistant_core/src/assistant.rs
//!
//! Assembles the AI request for a library question and turns the completion
//! service's outcome into the text shown to the user.

use crate::domain::{QueryMode, User};
use crate::ports::{BookCatalog, CompletionError, CompletionService, PortResult};
use crate::scope::resolve;
use crate::summary::library_data;
use tracing::{error, info};

const BASE_INSTRUCTIONS: &str = "You are a helpful library assistant. \
Answer questions using ONLY the library data provided in the message. \
Do not use outside knowledge about books or authors, and never recommend a book that is not listed in the data. \
Be friendly and concise. If asked about something not in the data, say so politely.";

const ADMIN_INSTRUCTIONS: &str = " You're assisting an admin who can see all users' data. \
When the admin asks about their own books (using words like \"my\", \"me\", \"mine\" or \"myself\"), \
the data contains only the admin's personal books; answer from those alone.";

const USER_INSTRUCTIONS: &str = " You're assisting a regular user viewing their personal library.";

const RECOMMENDATION_INSTRUCTIONS: &str = " The data lists books from other users' libraries; \
recommend only from that list.";

/// The answer to a library question together with the mode it was resolved in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub mode: QueryMode,
    pub text: String,
}

/// Builds the role-aware system instruction.
pub fn system_instruction(principal: &User, mode: QueryMode) -> String {
    let mut instruction = BASE_INSTRUCTIONS.to_string();
    if principal.is_admin {
        instruction.push_str(ADMIN_INSTRUCTIONS);
    } else {
        instruction.push_str(USER_INSTRUCTIONS);
    }
    if mode == QueryMode::Recommendation {
        instruction.push_str(RECOMMENDATION_INSTRUCTIONS);
    }
    instruction
}

/// Builds the user turn: the question followed by the grounding data.
pub fn user_message(question: &str, library_data: &str) -> String {
    format!(
        "Question: {}\n\n{}\n\nAnswer the question based on this data.",
        question, library_data
    )
}

/// The fixed message shown when the completion service fails.
pub fn apology(err: &CompletionError) -> String {
    format!("Sorry, there was an error connecting to AI: {}", err)
}

/// Sends one request to the completion service. Never fails: errors become
/// the apology text.
pub async fn ask_ai<S>(
    completion: &S,
    question: &str,
    library_data: &str,
    principal: &User,
    mode: QueryMode,
) -> String
where
    S: CompletionService + ?Sized,
{
    let system = system_instruction(principal, mode);
    let user = user_message(question, library_data);
    match completion.complete(&system, &user).await {
        Ok(answer) => answer,
        Err(e) => {
            error!("Completion service failed: {:?}", e);
            apology(&e)
        }
    }
}

/// Resolves, summarizes and answers a question on behalf of `principal`.
///
/// Only record-store failures are returned as errors.
pub async fn answer_question<C, S>(
    catalog: &C,
    completion: &S,
    question: &str,
    principal: &User,
) -> PortResult<Answer>
where
    C: BookCatalog + ?Sized,
    S: CompletionService + ?Sized,
{
    let question = question.trim();
    let ctx = resolve(catalog, question, principal).await?;
    let data = library_data(&ctx);
    info!("Asking AI with {} bytes of library data.", data.len());

    let text = ask_ai(completion, question, &data, principal, ctx.mode).await;
    Ok(Answer {
        mode: ctx.mode,
        text,
    })
}
