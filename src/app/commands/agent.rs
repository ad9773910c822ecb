//! Agent file management.
//!
//! Every operation targets the agents directory of one project; when no
//! project is given, the active project from the config is used.

use std::io;

use tracing::{debug, info, warn};

use crate::app::commands::config;
use crate::domain::{Agent, AgentDraft, AgentId, AppError, ProjectId, paths};
use crate::ports::DataStore;

const AGENT_EXTENSION: &str = "md";

#[derive(Debug, Clone, Default)]
pub struct CreateAgentInput {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub role: String,
    pub design_decisions: String,
    pub constraints: String,
    pub prompt_blueprint: Option<String>,
}

impl CreateAgentInput {
    /// Required fields for a hand-written agent. Agents created from a
    /// template are not checked; missing sections get placeholders.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id.trim().is_empty() || self.name.trim().is_empty() || self.role.trim().is_empty()
        {
            return Err(AppError::validation("id, name, and role are required"));
        }
        Ok(())
    }
}

/// Fields to change. `None` keeps the current value; an empty string clears
/// an optional section and resets a required one to its placeholder.
#[derive(Debug, Clone, Default)]
pub struct UpdateAgentInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub role: Option<String>,
    pub design_decisions: Option<String>,
    pub constraints: Option<String>,
    pub prompt_blueprint: Option<String>,
}

/// Resolve the target project: the given id, or the active project.
pub fn resolve_project<S: DataStore>(
    store: &S,
    project: Option<&str>,
) -> Result<ProjectId, AppError> {
    match project {
        Some(id) => ProjectId::new(id),
        None => ProjectId::new(&config::load(store)?.active_project),
    }
}

pub fn list<S: DataStore>(store: &S, project: Option<&str>) -> Result<Vec<Agent>, AppError> {
    let project = resolve_project(store, project)?;
    let mut agents = Vec::new();
    for (id, path) in agent_files(store, &project)? {
        let content = store.read_file(&path)?;
        agents.push(Agent::parse(&id, &content));
    }
    agents.sort_by(|a, b| a.id.cmp(&b.id));
    debug!(project = %project, count = agents.len(), "listed agents");
    Ok(agents)
}

pub fn list_ids<S: DataStore>(store: &S, project: Option<&str>) -> Result<Vec<String>, AppError> {
    let project = resolve_project(store, project)?;
    let mut ids: Vec<String> = agent_files(store, &project)?.into_iter().map(|(id, _)| id).collect();
    ids.sort();
    Ok(ids)
}

pub fn get<S: DataStore>(store: &S, agent_id: &str, project: Option<&str>) -> Result<Agent, AppError> {
    let project = resolve_project(store, project)?;
    let id = AgentId::existing(agent_id)?;
    match store.read_file(&paths::agent(&project, &id)) {
        Ok(content) => Ok(Agent::parse(id.as_str(), &content)),
        Err(err) => Err(not_found_as_agent(err, agent_id)),
    }
}

pub fn create<S: DataStore>(
    store: &S,
    input: CreateAgentInput,
    project: Option<&str>,
) -> Result<Agent, AppError> {
    if input.id.trim().is_empty() || input.name.trim().is_empty() {
        return Err(AppError::validation("id and name are required"));
    }
    let id = AgentId::new(&input.id)?;
    let project = resolve_project(store, project)?;

    store.create_dir_all(&paths::agents_dir(&project))?;
    let path = paths::agent(&project, &id);
    if store.file_exists(&path) {
        return Err(AppError::AgentExists(id.as_str().to_string()));
    }

    let draft = AgentDraft {
        name: input.name,
        category: input.category,
        role: input.role,
        design_decisions: input.design_decisions,
        constraints: input.constraints,
        prompt_blueprint: input.prompt_blueprint,
    };
    let content = draft.render()?;
    store.write_file(&path, &content)?;
    info!(agent = %id, project = %project, "agent created");

    Ok(Agent::parse(id.as_str(), &content))
}

pub fn update<S: DataStore>(
    store: &S,
    agent_id: &str,
    input: UpdateAgentInput,
    project: Option<&str>,
) -> Result<Agent, AppError> {
    let project = resolve_project(store, project)?;
    let agent = get(store, agent_id, Some(project.as_str()))?;
    let id = AgentId::existing(agent_id)?;

    let mut draft = agent.to_draft();
    if let Some(name) = input.name.filter(|name| !name.trim().is_empty()) {
        draft.name = name;
    }
    if let Some(category) = input.category {
        draft.category = Some(category).filter(|c| !c.trim().is_empty());
    }
    if let Some(role) = input.role {
        draft.role = role;
    }
    if let Some(design_decisions) = input.design_decisions {
        draft.design_decisions = design_decisions;
    }
    if let Some(constraints) = input.constraints {
        draft.constraints = constraints;
    }
    if let Some(blueprint) = input.prompt_blueprint {
        draft.prompt_blueprint = Some(blueprint).filter(|b| !b.trim().is_empty());
    }

    let content = draft.render()?;
    store.write_file(&paths::agent(&project, &id), &content)?;
    info!(agent = %id, project = %project, "agent updated");

    Ok(Agent::parse(id.as_str(), &content))
}

pub fn delete<S: DataStore>(store: &S, agent_id: &str, project: Option<&str>) -> Result<(), AppError> {
    let project = resolve_project(store, project)?;
    let id = AgentId::existing(agent_id)?;
    store
        .remove_file(&paths::agent(&project, &id))
        .map_err(|err| not_found_as_agent(err, agent_id))?;
    info!(agent = %id, project = %project, "agent deleted");
    Ok(())
}

/// `(id, path)` of every agent file in the project's agents directory.
fn agent_files<S: DataStore>(
    store: &S,
    project: &ProjectId,
) -> Result<Vec<(String, std::path::PathBuf)>, AppError> {
    let mut files = Vec::new();
    for path in store.list_files(&paths::agents_dir(project))? {
        if path.extension().and_then(|ext| ext.to_str()) != Some(AGENT_EXTENSION) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if AgentId::existing(stem).is_err() {
            warn!(file = %path.display(), "skipping agent file with an unusable name");
            continue;
        }
        files.push((stem.to_string(), path.clone()));
    }
    Ok(files)
}

fn not_found_as_agent(err: AppError, agent_id: &str) -> AppError {
    match err {
        AppError::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
            AppError::AgentNotFound(agent_id.to_string())
        }
        other => other,
    }
}
