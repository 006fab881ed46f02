//! services/api/src/adapters/completion_llm.rs
//!
//! This module contains the adapter for the library question-answering LLM.
//! It implements the `CompletionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use library_assistant_core::ports::{CompletionError, CompletionService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible chat model.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// Sorts an OpenAI client error into the port's failure kinds.
pub fn classify_openai_error(e: OpenAIError) -> CompletionError {
    match e {
        OpenAIError::Reqwest(err) if err.is_timeout() => CompletionError::Timeout(err.to_string()),
        OpenAIError::Reqwest(err) => CompletionError::Transport(err.to_string()),
        OpenAIError::ApiError(api) => CompletionError::Rejected(api.message),
        other => CompletionError::Transport(other.to_string()),
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiCompletionAdapter {
    /// Sends the system instruction and user message as a two-turn chat and
    /// returns the first choice's text. One attempt, no retry.
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_instruction)
                .build()
                .map_err(classify_openai_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(classify_openai_error)?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(classify_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_openai_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::EmptyResponse(
                    "The AI response contained no text content.".to_string(),
                )
            })
    }
}
