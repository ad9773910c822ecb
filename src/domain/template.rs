//! Agent templates: agent documents with YAML frontmatter and an
//! `{{AGENT_NAME}}` placeholder.

use serde::{Deserialize, Serialize};

use crate::domain::AppError;
use crate::domain::agent::{
    AgentDraft, CONSTRAINTS_HEADING, DESIGN_DECISIONS_HEADING, PROMPT_BLUEPRINT_HEADING,
    ROLE_HEADING,
};
use crate::domain::markdown::{extract_section, split_frontmatter};

pub const AGENT_NAME_PLACEHOLDER: &str = "{{AGENT_NAME}}";
pub const TEMPLATE_SUFFIX: &str = ".template.md";
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TemplateFrontmatter {
    // `key:` with no value parses as null
    template_id: Option<String>,
    name: Option<String>,
    category: Option<String>,
    description: Option<String>,
}

/// An agent template with its frontmatter metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTemplate {
    pub template_id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub content: String,
}

impl AgentTemplate {
    /// Parse a template file.
    ///
    /// Returns `Ok(None)` for documents without frontmatter; they are not
    /// templates. `origin` names the source in parse errors.
    pub fn parse(content: &str, origin: &str) -> Result<Option<Self>, AppError> {
        let Some((frontmatter, _)) = split_frontmatter(content) else {
            return Ok(None);
        };

        let meta: TemplateFrontmatter = if frontmatter.trim().is_empty() {
            TemplateFrontmatter::default()
        } else {
            serde_yaml::from_str(&frontmatter).map_err(|err| AppError::ParseError {
                what: format!("template frontmatter in {}", origin),
                details: err.to_string(),
            })?
        };

        Ok(Some(Self {
            template_id: meta.template_id.unwrap_or_default(),
            name: meta.name.unwrap_or_default(),
            category: meta.category.unwrap_or_default(),
            description: meta.description.unwrap_or_default(),
            content: content.to_string(),
        }))
    }

    /// Category used for grouping; blank categories group as `uncategorized`.
    pub fn group(&self) -> &str {
        let category = self.category.trim();
        if category.is_empty() { UNCATEGORIZED } else { category }
    }

    /// The template body with frontmatter removed and the agent name filled in.
    pub fn instantiate(&self, agent_name: &str) -> String {
        let body = split_frontmatter(&self.content).map(|(_, body)| body).unwrap_or_default();
        body.replace(AGENT_NAME_PLACEHOLDER, agent_name)
    }

    /// Build the draft of a new agent from this template.
    pub fn draft(&self, agent_name: &str) -> AgentDraft {
        let body = self.instantiate(agent_name);
        let category = self.category.trim();
        AgentDraft {
            name: agent_name.to_string(),
            category: if category.is_empty() { None } else { Some(category.to_string()) },
            role: extract_section(&body, ROLE_HEADING),
            design_decisions: extract_section(&body, DESIGN_DECISIONS_HEADING),
            constraints: extract_section(&body, CONSTRAINTS_HEADING),
            prompt_blueprint: Some(extract_section(&body, PROMPT_BLUEPRINT_HEADING))
                .filter(|blueprint| !blueprint.is_empty()),
        }
    }
}
