//! Composition of the runnable prompt and the compiler round trip.
//!
//! The base prompt is assembled from the project core, the selected agents,
//! and the user's change request. The compiler instruction wraps it for the
//! LLM, and the compiler's reply is split back into a prompt and an optional
//! document using fixed markers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::AppError;
use crate::domain::agent::Agent;
use crate::domain::markdown::normalize_newlines;
use crate::domain::project::{
    DIRECTION_HEADING, PRINCIPLES_HEADING, PURPOSE_HEADING, ProjectCore,
};
use crate::domain::render::{COMPILER_INSTRUCTION_TEMPLATE, render};

pub const PROMPT_MARKER: &str = "===PROMPT===";
pub const DOC_MARKER: &str = "===DOC===";

/// System message sent alongside the compiler instruction.
pub const COMPILER_SYSTEM_MESSAGE: &str = "You are a careful prompt compiler. Never invent design decisions or constraints. Be concise and structured.";

const EMPTY_FIELD: &str = "- (empty)";
const RULE: &str = "---\n\n";

/// Which context the request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Project,
    Agent,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Project => "project",
            Scope::Agent => "agent",
        }
    }
}

impl FromStr for Scope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Scope::Project),
            "agent" => Ok(Scope::Agent),
            _ => Err(AppError::validation("selectedScope must be 'project' or 'agent'.")),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the compiler is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    #[default]
    #[serde(rename = "prompt")]
    Prompt,
    #[serde(rename = "prompt+md")]
    PromptAndDoc,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Prompt => "prompt",
            OutputMode::PromptAndDoc => "prompt+md",
        }
    }

    pub fn includes_doc(&self) -> bool {
        matches!(self, OutputMode::PromptAndDoc)
    }
}

impl FromStr for OutputMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prompt" => Ok(OutputMode::Prompt),
            "prompt+md" => Ok(OutputMode::PromptAndDoc),
            _ => Err(AppError::validation("outputMode must be 'prompt' or 'prompt+md'.")),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to generate a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(rename = "selectedScope")]
    pub scope: Scope,
    #[serde(default)]
    pub selected_agents: Vec<String>,
    #[serde(default)]
    pub user_input: String,
    /// `None` falls back to the configured default mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_mode: Option<OutputMode>,
}

impl GenerateRequest {
    /// Check the request and return the trimmed user input.
    pub fn validate(&self) -> Result<&str, AppError> {
        let user_input = self.user_input.trim();
        if user_input.is_empty() {
            return Err(AppError::validation("userInput is required."));
        }
        if self.scope == Scope::Agent && self.selected_agents.is_empty() {
            return Err(AppError::validation(
                "When selectedScope is 'agent', selectedAgents is required.",
            ));
        }
        Ok(user_input)
    }

    /// Whether agent files have to be loaded for this request.
    pub fn needs_agents(&self) -> bool {
        self.scope == Scope::Agent || !self.selected_agents.is_empty()
    }
}

/// The compiler's reply, split at the output markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOutput {
    pub prompt: String,
    pub doc: Option<String>,
}

/// Compose the base prompt from the project core, agents, and user input.
pub fn compose_runnable_prompt(core: &ProjectCore, agents: &[Agent], user_input: &str) -> String {
    let mut out = String::new();

    out.push_str("# SYSTEM CONTEXT\n");
    out.push_str("You are assisting with a software project.\n");
    out.push_str("Do not invent new design decisions.\n");
    out.push_str("Only work within the given context.\n\n");
    out.push_str(RULE);

    out.push_str("# PROJECT CONTEXT\n\n");
    for (title, body) in [
        (PURPOSE_HEADING, &core.purpose),
        (PRINCIPLES_HEADING, &core.principles),
        (DIRECTION_HEADING, &core.direction),
    ] {
        out.push_str(&block_or_empty(title, body));
        out.push('\n');
    }
    out.push_str(RULE);

    if agents.is_empty() {
        out.push_str("# SUB-AGENT CONTEXT\n(none)\n\n");
    } else {
        out.push_str("# SUB-AGENT CONTEXT\n\n");
        let blocks: Vec<String> = agents.iter().map(agent_block).collect();
        out.push_str(&blocks.join("\n\n"));
        out.push_str("\n\n");
    }
    out.push_str(RULE);

    out.push_str("# CHANGE REQUEST\n");
    out.push_str(user_input.trim());
    out.push_str("\n\n");
    out.push_str(RULE);

    let blueprints: Vec<&str> = agents
        .iter()
        .filter_map(|agent| agent.prompt_blueprint.as_deref().map(str::trim))
        .filter(|blueprint| !blueprint.is_empty())
        .collect();
    if !blueprints.is_empty() {
        out.push_str("# SUB-AGENT PROMPT BLUEPRINTS\n");
        let numbered: Vec<String> = blueprints
            .iter()
            .enumerate()
            .map(|(i, blueprint)| format!("## Blueprint {}\n{}", i + 1, blueprint))
            .collect();
        out.push_str(&numbered.join("\n\n"));
        out.push_str("\n\n");
        out.push_str(RULE);
    }

    out.push_str("# TASK\n");
    out.push_str("- Apply the requested change only where relevant\n");
    out.push_str("- Respect all existing design decisions\n");
    out.push_str("- If something is ambiguous, ask questions before implementing\n");
    out.push_str("- Output the result for immediate use in vibe coding\n");

    format!("{}\n", out.trim())
}

/// Wrap the base prompt in the instruction sent to the compiler model.
pub fn build_compiler_instruction(
    base_prompt: &str,
    output_mode: OutputMode,
) -> Result<String, AppError> {
    render(
        COMPILER_INSTRUCTION_TEMPLATE,
        json!({
            "prompt_marker": PROMPT_MARKER,
            "doc_marker": DOC_MARKER,
            "include_doc": output_mode.includes_doc(),
            "base_prompt": base_prompt.trim_end(),
        }),
    )
}

/// Split the compiler's reply into the prompt and the optional document.
///
/// Text without a prompt marker is taken as the prompt verbatim.
pub fn split_compiler_output(output_text: &str) -> CompilerOutput {
    let text = normalize_newlines(output_text);
    let Some(start) = text.find(PROMPT_MARKER) else {
        return CompilerOutput { prompt: text, doc: None };
    };

    let after_prompt = text[start + PROMPT_MARKER.len()..].trim();
    match after_prompt.find(DOC_MARKER) {
        None => CompilerOutput { prompt: after_prompt.to_string(), doc: None },
        Some(doc_start) => {
            let prompt = after_prompt[..doc_start].trim().to_string();
            let doc = after_prompt[doc_start + DOC_MARKER.len()..].trim();
            CompilerOutput {
                prompt,
                doc: if doc.is_empty() { None } else { Some(doc.to_string()) },
            }
        }
    }
}

fn block(title: &str, content: &str) -> Option<String> {
    let content = content.trim();
    if content.is_empty() { None } else { Some(format!("## {}\n{}\n", title, content)) }
}

fn block_or_empty(title: &str, content: &str) -> String {
    block(title, content).unwrap_or_else(|| format!("## {}\n{}\n", title, EMPTY_FIELD))
}

fn agent_block(agent: &Agent) -> String {
    let mut out = format!("## Agent: {}\n", agent.name);
    out.push_str(&block_or_empty("Role", &agent.role));
    out.push_str(&block_or_empty("Design Decisions", &agent.design_decisions));
    out.push_str(&block_or_empty("Constraints", &agent.constraints));
    if let Some(blueprint) = agent.prompt_blueprint.as_deref().and_then(|b| block("Prompt Blueprint", b)) {
        out.push_str(&blueprint);
    }
    out.trim().to_string()
}
