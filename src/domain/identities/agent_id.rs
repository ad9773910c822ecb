use super::validation::{IdentifierRules, validate_identifier};
use crate::domain::AppError;

/// A validated agent identifier (the agent file name without `.md`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(String);

impl AgentId {
    /// Validate an id for a new agent file: `^[a-z0-9.-]+$`.
    pub fn new(id: &str) -> Result<Self, AppError> {
        if validate_identifier(id, IdentifierRules::NEW_AGENT) {
            Ok(Self(id.to_string()))
        } else {
            Err(AppError::InvalidAgentId(id.to_string()))
        }
    }

    /// Validate an id that refers to an existing file.
    ///
    /// Files written by hand may use uppercase letters or underscores, so
    /// lookups accept them while still rejecting anything path-like.
    pub fn existing(id: &str) -> Result<Self, AppError> {
        if validate_identifier(id, IdentifierRules::EXISTING_AGENT) {
            Ok(Self(id.to_string()))
        } else {
            Err(AppError::InvalidAgentId(id.to_string()))
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.md", self.0)
    }

    /// Return the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
