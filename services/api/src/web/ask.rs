//! services/api/src/web/ask.rs
//!
//! The natural-language query endpoint.

use crate::web::{rest::port_error_response, state::AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use library_assistant_core::{assistant::answer_question, domain::User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AiQueryRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct AiQueryResponse {
    /// How the question was scoped: normal_user, normal_admin, personal_admin or recommendation.
    pub mode: String,
    pub response: String,
}

/// POST /ai-query - Ask a question about the library
///
/// AI failures are reported inside `response`, never as an error status.
#[utoipa::path(
    post,
    path = "/ai-query",
    request_body = AiQueryRequest,
    responses(
        (status = 200, description = "The assistant's answer", body = AiQueryResponse),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Library data could not be read")
    )
)]
pub async fn ai_query_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(req): Json<AiQueryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    info!("AI query from {}.", user.username);
    let answer = answer_question(&*state.db, &*state.completion, &req.question, &user)
        .await
        .map_err(|e| port_error_response("Failed to read library data", e))?;

    Ok(Json(AiQueryResponse {
        mode: answer.mode.to_string(),
        response: answer.text,
    }))
}
