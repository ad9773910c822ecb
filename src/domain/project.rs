//! Project metadata and the `project.core.md` document.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::AppError;
use crate::domain::markdown::{extract_section, normalize_newlines};
use crate::domain::render::{PROJECT_CORE_TEMPLATE, render};

pub const PURPOSE_HEADING: &str = "Purpose";
pub const PRINCIPLES_HEADING: &str = "Philosophy / Principles";
pub const DIRECTION_HEADING: &str = "Long-term Direction";

const PURPOSE_PLACEHOLDER: &str = "- (define the project purpose)";
const PRINCIPLES_PLACEHOLDER: &str = "- (define the design principles)";
const DIRECTION_PLACEHOLDER: &str = "- (define the long-term direction)";

/// Registry entry for a project, stored in `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Parsed content of a `project.core.md` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectCore {
    pub purpose: String,
    pub principles: String,
    pub direction: String,
    pub raw: String,
}

impl ProjectCore {
    pub fn parse(markdown: &str) -> Self {
        Self {
            purpose: extract_section(markdown, PURPOSE_HEADING),
            principles: extract_section(markdown, PRINCIPLES_HEADING),
            direction: extract_section(markdown, DIRECTION_HEADING),
            raw: normalize_newlines(markdown),
        }
    }

    /// Render a core document; blank fields get a placeholder bullet.
    pub fn render(purpose: &str, principles: &str, direction: &str) -> Result<String, AppError> {
        render(
            PROJECT_CORE_TEMPLATE,
            json!({
                "purpose": or_placeholder(purpose, PURPOSE_PLACEHOLDER),
                "principles": or_placeholder(principles, PRINCIPLES_PLACEHOLDER),
                "direction": or_placeholder(direction, DIRECTION_PLACEHOLDER),
            }),
        )
    }

    /// The core a project has before anyone edits it.
    pub fn empty() -> Result<Self, AppError> {
        Ok(Self::parse(&Self::render("", "", "")?))
    }
}

/// A project: registry metadata plus its parsed core.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    #[serde(flatten)]
    pub meta: ProjectMeta,
    pub core: ProjectCore,
}

pub(crate) fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() { placeholder } else { trimmed }
}
