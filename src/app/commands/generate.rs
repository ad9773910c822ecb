//! End-to-end generation: compose the base prompt and run it through the
//! compiler model.

use serde::Serialize;
use tracing::{debug, info};

use crate::app::AppContext;
use crate::app::commands::{agent, config, project};
use crate::domain::compose::COMPILER_SYSTEM_MESSAGE;
use crate::domain::{
    AppError, CompilerApiConfig, GenerateRequest, build_compiler_instruction,
    compose_runnable_prompt, split_compiler_output,
};
use crate::ports::{
    CompletionClient, CompletionMessage, CompletionRequest, DataStore, TemplateCatalog,
};

/// Environment variable overriding the configured model.
pub const MODEL_ENV: &str = "OPENAI_MODEL";
/// Model recorded when no compiler call is made.
pub const BASE_ONLY_MODEL: &str = "none";

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Project to read; the active project when `None`.
    pub project: Option<String>,
    /// Model override; wins over `OPENAI_MODEL` and the configured default.
    pub model: Option<String>,
    /// Return the composed base prompt without calling the compiler.
    pub base_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutput {
    pub generated_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_doc: Option<String>,
    pub meta: GenerateMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateMeta {
    pub model: String,
}

/// Run a generate request.
///
/// `connect` builds the compiler client from the loaded configuration; it is
/// not called in base-only mode.
pub fn execute<S, T, F>(
    ctx: &AppContext<S, T>,
    request: &GenerateRequest,
    options: &GenerateOptions,
    connect: F,
) -> Result<GenerateOutput, AppError>
where
    S: DataStore,
    T: TemplateCatalog,
    F: FnOnce(&CompilerApiConfig) -> Result<Box<dyn CompletionClient>, AppError>,
{
    let user_input = request.validate()?;
    let config = config::load(ctx.store())?;

    let project_id = options.project.clone().unwrap_or_else(|| config.active_project.clone());
    let core = project::get(ctx.store(), &project_id)?.core;

    let agents = if request.needs_agents() {
        request
            .selected_agents
            .iter()
            .map(|id| agent::get(ctx.store(), id, Some(&project_id)))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    let base_prompt = compose_runnable_prompt(&core, &agents, user_input);
    debug!(
        project = %project_id,
        agents = agents.len(),
        bytes = base_prompt.len(),
        "composed base prompt"
    );

    if options.base_only {
        return Ok(GenerateOutput {
            generated_prompt: base_prompt,
            generated_doc: None,
            meta: GenerateMeta { model: BASE_ONLY_MODEL.to_string() },
        });
    }

    let output_mode = request.output_mode.unwrap_or(config.defaults.output_mode);
    let model = select_model(
        options.model.as_deref(),
        std::env::var(MODEL_ENV).ok(),
        &config.defaults.model,
    );
    let instruction = build_compiler_instruction(&base_prompt, output_mode)?;

    let client = connect(&config.compiler)?;
    info!(model = %model, mode = %output_mode, "calling compiler");
    let response = client.complete(CompletionRequest {
        model: model.clone(),
        messages: vec![
            CompletionMessage::system(COMPILER_SYSTEM_MESSAGE),
            CompletionMessage::user(instruction),
        ],
    })?;

    let compiled = split_compiler_output(&response.output_text);
    let generated_prompt = if compiled.prompt.is_empty() { base_prompt } else { compiled.prompt };
    let generated_doc =
        if output_mode.includes_doc() { Some(compiled.doc.unwrap_or_default()) } else { None };

    Ok(GenerateOutput { generated_prompt, generated_doc, meta: GenerateMeta { model } })
}

/// Flag, then environment, then configured default. Blank values are ignored.
fn select_model(flag: Option<&str>, env: Option<String>, configured: &str) -> String {
    flag.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| env.map(|value| value.trim().to_string()).filter(|value| !value.is_empty()))
        .unwrap_or_else(|| configured.to_string())
}
