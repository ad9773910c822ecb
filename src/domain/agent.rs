//! Sub-agent definitions stored as `<agent-id>.md`.

use serde::Serialize;
use serde_json::json;

use crate::domain::AppError;
use crate::domain::markdown::{extract_section, extract_title, normalize_newlines};
use crate::domain::project::or_placeholder;
use crate::domain::render::{AGENT_TEMPLATE, render};

pub const TITLE_PREFIX: &str = "Sub-Agent";
pub const CATEGORY_HEADING: &str = "Category";
pub const ROLE_HEADING: &str = "Role";
pub const DESIGN_DECISIONS_HEADING: &str = "Design Decisions";
pub const CONSTRAINTS_HEADING: &str = "Constraints";
pub const PROMPT_BLUEPRINT_HEADING: &str = "Prompt Blueprint";

const ROLE_PLACEHOLDER: &str = "- (define the agent role)";
const DESIGN_DECISIONS_PLACEHOLDER: &str = "- (define the design decisions)";
const CONSTRAINTS_PLACEHOLDER: &str = "- (define the constraints)";

/// A parsed agent file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub role: String,
    pub design_decisions: String,
    pub constraints: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_blueprint: Option<String>,
    pub raw: String,
}

/// Field values an agent file is rendered from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentDraft {
    pub name: String,
    pub category: Option<String>,
    pub role: String,
    pub design_decisions: String,
    pub constraints: String,
    pub prompt_blueprint: Option<String>,
}

impl Agent {
    /// Parse an agent document. The name falls back to `id` when the file has
    /// no `# Sub-Agent: <name>` title.
    pub fn parse(id: &str, markdown: &str) -> Self {
        Self {
            id: id.to_string(),
            name: extract_title(markdown, TITLE_PREFIX).unwrap_or_else(|| id.to_string()),
            category: non_empty(extract_section(markdown, CATEGORY_HEADING)),
            role: extract_section(markdown, ROLE_HEADING),
            design_decisions: extract_section(markdown, DESIGN_DECISIONS_HEADING),
            constraints: extract_section(markdown, CONSTRAINTS_HEADING),
            prompt_blueprint: non_empty(extract_section(markdown, PROMPT_BLUEPRINT_HEADING)),
            raw: normalize_newlines(markdown),
        }
    }

    /// The current field values, ready to be edited and rendered again.
    pub fn to_draft(&self) -> AgentDraft {
        AgentDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            role: self.role.clone(),
            design_decisions: self.design_decisions.clone(),
            constraints: self.constraints.clone(),
            prompt_blueprint: self.prompt_blueprint.clone(),
        }
    }
}

impl AgentDraft {
    pub fn render(&self) -> Result<String, AppError> {
        let category = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let blueprint = self.prompt_blueprint.as_deref().map(str::trim).filter(|b| !b.is_empty());

        render(
            AGENT_TEMPLATE,
            json!({
                "name": self.name.trim(),
                "category": category,
                "role": or_placeholder(&self.role, ROLE_PLACEHOLDER),
                "design_decisions": or_placeholder(&self.design_decisions, DESIGN_DECISIONS_PLACEHOLDER),
                "constraints": or_placeholder(&self.constraints, CONSTRAINTS_PLACEHOLDER),
                "prompt_blueprint": blueprint,
            }),
        )
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
