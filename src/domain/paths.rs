//! Layout of the data directory.
//!
//! All paths are relative to the data root. The `default` project keeps the
//! flat layout (`project.core.md`, `agents/`) at the root; every other
//! project lives under `projects/<id>/`.

use std::path::PathBuf;

use crate::domain::config::CONFIG_FILE;
use crate::domain::identities::{AgentId, ProjectId};

pub const PROJECT_CORE_FILE: &str = "project.core.md";
pub const AGENTS_DIR: &str = "agents";
pub const PROJECTS_DIR: &str = "projects";

pub fn config() -> PathBuf {
    PathBuf::from(CONFIG_FILE)
}

/// `projects/<id>`; `None` for the default project, which has no directory
/// of its own.
pub fn project_dir(project: &ProjectId) -> Option<PathBuf> {
    if project.is_default() {
        None
    } else {
        Some(PathBuf::from(PROJECTS_DIR).join(project.as_str()))
    }
}

pub fn project_core(project: &ProjectId) -> PathBuf {
    match project_dir(project) {
        Some(dir) => dir.join(PROJECT_CORE_FILE),
        None => PathBuf::from(PROJECT_CORE_FILE),
    }
}

pub fn agents_dir(project: &ProjectId) -> PathBuf {
    match project_dir(project) {
        Some(dir) => dir.join(AGENTS_DIR),
        None => PathBuf::from(AGENTS_DIR),
    }
}

pub fn agent(project: &ProjectId, agent: &AgentId) -> PathBuf {
    agents_dir(project).join(agent.file_name())
}

pub fn agent_templates_dir() -> PathBuf {
    PathBuf::from("templates").join("agents")
}
