use super::validation::{IdentifierRules, validate_identifier};
use crate::domain::AppError;

/// Id of the project that always exists and keeps the legacy flat layout.
pub const DEFAULT_PROJECT_ID: &str = "default";

/// A validated project identifier.
///
/// Guarantees:
/// - Non-empty
/// - Contains only lowercase ASCII letters, digits, or `-`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    /// Validate and create a new `ProjectId`.
    pub fn new(id: &str) -> Result<Self, AppError> {
        if validate_identifier(id, IdentifierRules::PROJECT) {
            Ok(Self(id.to_string()))
        } else {
            Err(AppError::InvalidProjectId(id.to_string()))
        }
    }

    pub fn default_project() -> Self {
        Self(DEFAULT_PROJECT_ID.to_string())
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_PROJECT_ID
    }

    /// Return the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
