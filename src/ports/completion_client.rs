//! Compiler model client port definition.

use serde::Serialize;

use crate::domain::AppError;

/// Author of a message in a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// A single input message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl CompletionMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: MessageRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }
}

/// Request sent to the compiler model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "gpt-4o-mini").
    pub model: String,
    /// Ordered input messages.
    pub messages: Vec<CompletionMessage>,
}

/// Text produced by the compiler model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub output_text: String,
}

/// Port for compiler model calls.
pub trait CompletionClient {
    fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AppError>;
}
