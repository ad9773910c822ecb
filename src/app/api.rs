//! API Facade for the application.
//!
//! Each function resolves the data directory (explicit path, then
//! `VIBEPROMPT_DATA_DIR`, then `./data`), builds the context, and runs one
//! command.

use std::collections::BTreeMap;
use std::path::Path;

use crate::adapters::openai_client_http::{API_KEY_ENV, api_key_from_env};
use crate::adapters::{
    EmbeddedTemplateCatalog, FilesystemDataStore, HttpOpenAiClient, RetryPolicy,
    RetryingCompletionClient,
};
use crate::app::AppContext;
use crate::app::commands::{agent, config, generate, project, template};
use crate::ports::CompletionClient;

pub use crate::app::commands::agent::{CreateAgentInput, UpdateAgentInput};
pub use crate::app::commands::generate::{GenerateMeta, GenerateOptions, GenerateOutput};
pub use crate::app::commands::project::{CreateProjectInput, UpdateProjectInput};
pub use crate::domain::{
    Agent, AgentTemplate, AppError, ConfigUpdate, GenerateRequest, OutputMode, Project,
    ProjectMeta, Scope, SystemConfig,
};

fn create_context(
    data_dir: Option<&Path>,
) -> Result<AppContext<FilesystemDataStore, EmbeddedTemplateCatalog>, AppError> {
    let store = FilesystemDataStore::resolve(data_dir.map(Path::to_path_buf))?;
    Ok(AppContext::new(store, EmbeddedTemplateCatalog::new()))
}

// =============================================================================
// Projects
// =============================================================================

pub fn project_list(data_dir: Option<&Path>) -> Result<Vec<ProjectMeta>, AppError> {
    let ctx = create_context(data_dir)?;
    project::list(ctx.store())
}

pub fn project_get(data_dir: Option<&Path>, id: &str) -> Result<Project, AppError> {
    let ctx = create_context(data_dir)?;
    project::get(ctx.store(), id)
}

pub fn project_active(data_dir: Option<&Path>) -> Result<Project, AppError> {
    let ctx = create_context(data_dir)?;
    project::active(ctx.store())
}

pub fn project_create(
    data_dir: Option<&Path>,
    input: CreateProjectInput,
) -> Result<Project, AppError> {
    let ctx = create_context(data_dir)?;
    project::create(ctx.store(), input)
}

pub fn project_update(
    data_dir: Option<&Path>,
    id: &str,
    input: UpdateProjectInput,
) -> Result<Project, AppError> {
    let ctx = create_context(data_dir)?;
    project::update(ctx.store(), id, input)
}

pub fn project_delete(data_dir: Option<&Path>, id: &str) -> Result<(), AppError> {
    let ctx = create_context(data_dir)?;
    project::delete(ctx.store(), id)
}

/// Make a project the active one.
pub fn project_use(data_dir: Option<&Path>, id: &str) -> Result<Project, AppError> {
    let ctx = create_context(data_dir)?;
    project::use_project(ctx.store(), id)
}

// =============================================================================
// Agents
// =============================================================================

pub fn agent_list(data_dir: Option<&Path>, project: Option<&str>) -> Result<Vec<Agent>, AppError> {
    let ctx = create_context(data_dir)?;
    agent::list(ctx.store(), project)
}

pub fn agent_ids(data_dir: Option<&Path>, project: Option<&str>) -> Result<Vec<String>, AppError> {
    let ctx = create_context(data_dir)?;
    agent::list_ids(ctx.store(), project)
}

pub fn agent_get(
    data_dir: Option<&Path>,
    id: &str,
    project: Option<&str>,
) -> Result<Agent, AppError> {
    let ctx = create_context(data_dir)?;
    agent::get(ctx.store(), id, project)
}

pub fn agent_create(
    data_dir: Option<&Path>,
    input: CreateAgentInput,
    project: Option<&str>,
) -> Result<Agent, AppError> {
    input.validate()?;
    let ctx = create_context(data_dir)?;
    agent::create(ctx.store(), input, project)
}

pub fn agent_update(
    data_dir: Option<&Path>,
    id: &str,
    input: UpdateAgentInput,
    project: Option<&str>,
) -> Result<Agent, AppError> {
    let ctx = create_context(data_dir)?;
    agent::update(ctx.store(), id, input, project)
}

pub fn agent_delete(data_dir: Option<&Path>, id: &str, project: Option<&str>) -> Result<(), AppError> {
    let ctx = create_context(data_dir)?;
    agent::delete(ctx.store(), id, project)
}

/// Create an agent from a template.
pub fn agent_from_template(
    data_dir: Option<&Path>,
    template_id: &str,
    agent_id: &str,
    agent_name: &str,
    project: Option<&str>,
) -> Result<Agent, AppError> {
    let ctx = create_context(data_dir)?;
    template::create_agent_from_template(&ctx, template_id, agent_id, agent_name, project)
}

// =============================================================================
// Templates
// =============================================================================

pub fn template_list(data_dir: Option<&Path>) -> Result<Vec<AgentTemplate>, AppError> {
    let ctx = create_context(data_dir)?;
    template::list(&ctx)
}

pub fn template_get(data_dir: Option<&Path>, template_id: &str) -> Result<AgentTemplate, AppError> {
    let ctx = create_context(data_dir)?;
    template::get(&ctx, template_id)
}

pub fn template_list_by_category(
    data_dir: Option<&Path>,
) -> Result<BTreeMap<String, Vec<AgentTemplate>>, AppError> {
    let ctx = create_context(data_dir)?;
    template::list_by_category(&ctx)
}

// =============================================================================
// Config
// =============================================================================

pub fn config_show(data_dir: Option<&Path>) -> Result<SystemConfig, AppError> {
    let ctx = create_context(data_dir)?;
    config::load(ctx.store())
}

pub fn config_update(data_dir: Option<&Path>, update: ConfigUpdate) -> Result<SystemConfig, AppError> {
    let ctx = create_context(data_dir)?;
    config::update(ctx.store(), update)
}

// =============================================================================
// Generate
// =============================================================================

/// Compose a prompt and, unless `base_only` is set, compile it with the
/// configured model.
///
/// `OPENAI_API_KEY` is checked before any file is read.
pub fn generate(
    data_dir: Option<&Path>,
    request: &GenerateRequest,
    options: &GenerateOptions,
) -> Result<GenerateOutput, AppError> {
    request.validate()?;
    let api_key = if options.base_only { None } else { Some(api_key_from_env()?) };

    let ctx = create_context(data_dir)?;
    generate::execute(&ctx, request, options, |compiler| {
        let key =
            api_key.ok_or_else(|| AppError::EnvironmentVariableMissing(API_KEY_ENV.to_string()))?;
        let http = HttpOpenAiClient::new(key, compiler)?;
        let retrying =
            RetryingCompletionClient::new(Box::new(http), RetryPolicy::from_config(compiler));
        Ok(Box::new(retrying) as Box<dyn CompletionClient>)
    })
}
