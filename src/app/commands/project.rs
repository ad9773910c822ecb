//! Project registry and `project.core.md` management.

use std::io;

use tracing::{debug, info};

use crate::app::commands::config;
use crate::domain::{AppError, Project, ProjectCore, ProjectId, ProjectMeta, paths};
use crate::ports::DataStore;

#[derive(Debug, Clone, Default)]
pub struct CreateProjectInput {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub principles: Option<String>,
    pub direction: Option<String>,
}

/// Fields to change. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub principles: Option<String>,
    pub direction: Option<String>,
}

pub fn list<S: DataStore>(store: &S) -> Result<Vec<ProjectMeta>, AppError> {
    Ok(config::load(store)?.projects)
}

pub fn get<S: DataStore>(store: &S, project_id: &str) -> Result<Project, AppError> {
    let config = config::load(store)?;
    let meta = config
        .project(project_id)
        .cloned()
        .ok_or_else(|| AppError::ProjectNotFound(project_id.to_string()))?;
    let id = ProjectId::new(project_id)?;
    let core = read_core(store, &id)?;
    Ok(Project { meta, core })
}

pub fn active<S: DataStore>(store: &S) -> Result<Project, AppError> {
    let config = config::load(store)?;
    get(store, &config.active_project)
}

pub fn create<S: DataStore>(store: &S, input: CreateProjectInput) -> Result<Project, AppError> {
    let id = ProjectId::new(&input.id)?;
    if input.name.trim().is_empty() {
        return Err(AppError::validation("id and name are required"));
    }

    let meta = ProjectMeta {
        id: id.as_str().to_string(),
        name: input.name.trim().to_string(),
        description: input.description,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    config::add_project_meta(store, meta.clone())?;

    if !id.is_default() {
        store.create_dir_all(&paths::agents_dir(&id))?;
    }

    let content = ProjectCore::render(
        input.purpose.as_deref().unwrap_or_default(),
        input.principles.as_deref().unwrap_or_default(),
        input.direction.as_deref().unwrap_or_default(),
    )?;
    store.write_file(&paths::project_core(&id), &content)?;
    info!(project = %id, "project created");

    Ok(Project { meta, core: ProjectCore::parse(&content) })
}

pub fn update<S: DataStore>(
    store: &S,
    project_id: &str,
    input: UpdateProjectInput,
) -> Result<Project, AppError> {
    let project = get(store, project_id)?;
    let id = ProjectId::new(project_id)?;

    let content = ProjectCore::render(
        input.purpose.as_deref().unwrap_or(&project.core.purpose),
        input.principles.as_deref().unwrap_or(&project.core.principles),
        input.direction.as_deref().unwrap_or(&project.core.direction),
    )?;
    store.write_file(&paths::project_core(&id), &content)?;

    let rename = input.name.filter(|name| !name.trim().is_empty());
    if rename.is_some() || input.description.is_some() {
        let mut config = config::load(store)?;
        if let Some(meta) = config.project_mut(project_id) {
            if let Some(name) = rename {
                meta.name = name.trim().to_string();
            }
            if let Some(description) = input.description {
                meta.description = Some(description);
            }
        }
        config::save(store, &config)?;
    }
    info!(project = %id, "project updated");

    get(store, project_id)
}

/// Unregister a project and remove its directory.
pub fn delete<S: DataStore>(store: &S, project_id: &str) -> Result<(), AppError> {
    let id = ProjectId::new(project_id)?;
    if id.is_default() {
        return Err(AppError::DefaultProjectProtected);
    }
    config::remove_project_meta(store, project_id)?;
    if let Some(dir) = paths::project_dir(&id) {
        store.remove_dir_all(&dir)?;
    }
    info!(project = %id, "project deleted");
    Ok(())
}

/// Make a project the active one.
pub fn use_project<S: DataStore>(store: &S, project_id: &str) -> Result<Project, AppError> {
    config::set_active_project(store, project_id)?;
    get(store, project_id)
}

fn read_core<S: DataStore>(store: &S, id: &ProjectId) -> Result<ProjectCore, AppError> {
    match store.read_file(&paths::project_core(id)) {
        Ok(content) => Ok(ProjectCore::parse(&content)),
        Err(AppError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            debug!(project = %id, "no core file, using empty core");
            ProjectCore::empty()
        }
        Err(err) => Err(err),
    }
}
