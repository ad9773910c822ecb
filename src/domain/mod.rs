pub mod agent;
pub mod compose;
pub mod config;
pub mod error;
pub mod identities;
pub mod markdown;
pub mod paths;
pub mod project;
mod render;
pub mod template;

pub use agent::{Agent, AgentDraft};
pub use compose::{
    CompilerOutput, GenerateRequest, OutputMode, Scope, build_compiler_instruction,
    compose_runnable_prompt, split_compiler_output,
};
pub use config::{CompilerApiConfig, ConfigUpdate, Defaults, SystemConfig};
pub use error::AppError;
pub use identities::{AgentId, DEFAULT_PROJECT_ID, ProjectId};
pub use markdown::extract_section;
pub use project::{Project, ProjectCore, ProjectMeta};
pub use template::AgentTemplate;
