//! Agent templates: built-in catalog merged with the data directory.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::app::AppContext;
use crate::app::commands::agent::{self, CreateAgentInput};
use crate::domain::template::TEMPLATE_SUFFIX;
use crate::domain::{Agent, AgentTemplate, AppError, paths};
use crate::ports::{DataStore, TemplateCatalog, TemplateFile};

/// All templates, sorted by template id.
///
/// A template in `templates/agents/` replaces the built-in one with the
/// same id. Templates that fail to parse or carry no id are skipped.
pub fn list<S, T>(ctx: &AppContext<S, T>) -> Result<Vec<AgentTemplate>, AppError>
where
    S: DataStore,
    T: TemplateCatalog,
{
    let mut by_id = BTreeMap::new();

    for file in ctx.templates().builtin_templates() {
        if let Some(template) = parse_or_skip(&file) {
            by_id.insert(template.template_id.clone(), template);
        }
    }

    for path in ctx.store().list_files(&paths::agent_templates_dir())? {
        let origin = path.display().to_string();
        if !origin.ends_with(TEMPLATE_SUFFIX) {
            continue;
        }
        let content = ctx.store().read_file(&path)?;
        if let Some(template) = parse_or_skip(&TemplateFile { origin, content }) {
            by_id.insert(template.template_id.clone(), template);
        }
    }

    debug!(count = by_id.len(), "listed templates");
    Ok(by_id.into_values().collect())
}

pub fn get<S, T>(ctx: &AppContext<S, T>, template_id: &str) -> Result<AgentTemplate, AppError>
where
    S: DataStore,
    T: TemplateCatalog,
{
    list(ctx)?
        .into_iter()
        .find(|template| template.template_id == template_id)
        .ok_or_else(|| AppError::TemplateNotFound(template_id.to_string()))
}

/// Templates grouped by category; blank categories group as `uncategorized`.
pub fn list_by_category<S, T>(
    ctx: &AppContext<S, T>,
) -> Result<BTreeMap<String, Vec<AgentTemplate>>, AppError>
where
    S: DataStore,
    T: TemplateCatalog,
{
    let mut groups: BTreeMap<String, Vec<AgentTemplate>> = BTreeMap::new();
    for template in list(ctx)? {
        groups.entry(template.group().to_string()).or_default().push(template);
    }
    Ok(groups)
}

pub fn create_agent_from_template<S, T>(
    ctx: &AppContext<S, T>,
    template_id: &str,
    agent_id: &str,
    agent_name: &str,
    project: Option<&str>,
) -> Result<Agent, AppError>
where
    S: DataStore,
    T: TemplateCatalog,
{
    if template_id.trim().is_empty() || agent_id.trim().is_empty() || agent_name.trim().is_empty()
    {
        return Err(AppError::validation("templateId, agentId, and agentName are required"));
    }

    let draft = get(ctx, template_id)?.draft(agent_name.trim());
    let input = CreateAgentInput {
        id: agent_id.to_string(),
        name: draft.name,
        category: draft.category,
        role: draft.role,
        design_decisions: draft.design_decisions,
        constraints: draft.constraints,
        prompt_blueprint: draft.prompt_blueprint,
    };
    agent::create(ctx.store(), input, project)
}

fn parse_or_skip(file: &TemplateFile) -> Option<AgentTemplate> {
    match AgentTemplate::parse(&file.content, &file.origin) {
        Ok(Some(template)) if !template.template_id.trim().is_empty() => Some(template),
        Ok(Some(_)) => {
            warn!(origin = %file.origin, "skipping template without templateId");
            None
        }
        Ok(None) => None,
        Err(err) => {
            warn!(origin = %file.origin, error = %err, "skipping malformed template");
            None
        }
    }
}
