use std::io;

use thiserror::Error;

/// Library-wide error type for vibeprompt operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// JSON serialization or deserialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Project identifier is invalid.
    #[error("Project ID must be lowercase alphanumeric with hyphens only: '{0}'")]
    InvalidProjectId(String),

    /// Agent identifier is invalid.
    #[error("Agent ID must be lowercase alphanumeric with dots and hyphens only: '{0}'")]
    InvalidAgentId(String),

    /// Project is not registered in the system config.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Agent file does not exist.
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    /// No template carries the requested template id.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Project id already registered.
    #[error("Project already exists: {0}")]
    ProjectExists(String),

    /// Agent file already present.
    #[error("Agent already exists: {0}")]
    AgentExists(String),

    /// The default project cannot be removed.
    #[error("Cannot delete default project")]
    DefaultProjectProtected,

    /// Configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Required environment variable is not set.
    #[error("Environment variable '{0}' is not set")]
    EnvironmentVariableMissing(String),

    /// A path resolved outside the data directory.
    #[error("Path traversal detected: {0}")]
    PathTraversal(String),

    /// Parse error.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    /// Template rendering failed.
    #[error("Failed to render template {template}: {reason}")]
    TemplateRender { template: String, reason: String },

    /// Compiler API request failed.
    #[error("Compiler API error{}: {message}", format_status(.status))]
    CompletionApi { message: String, status: Option<u16> },
}

fn format_status(status: &Option<u16>) -> String {
    status.map(|code| format!(" ({})", code)).unwrap_or_default()
}

impl AppError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(message.into())
    }

    /// Provide an `io::ErrorKind`-like view of the failure.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Json(_)
            | AppError::Validation(_)
            | AppError::InvalidProjectId(_)
            | AppError::InvalidAgentId(_)
            | AppError::DefaultProjectProtected
            | AppError::InvalidConfig(_)
            | AppError::PathTraversal(_)
            | AppError::ParseError { .. }
            | AppError::TemplateRender { .. } => io::ErrorKind::InvalidInput,
            AppError::ProjectNotFound(_)
            | AppError::AgentNotFound(_)
            | AppError::TemplateNotFound(_)
            | AppError::EnvironmentVariableMissing(_) => io::ErrorKind::NotFound,
            AppError::ProjectExists(_) | AppError::AgentExists(_) => io::ErrorKind::AlreadyExists,
            AppError::CompletionApi { .. } => io::ErrorKind::Other,
        }
    }
}
