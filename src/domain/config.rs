//! System configuration stored in `config.json`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;
use crate::domain::compose::OutputMode;
use crate::domain::identities::DEFAULT_PROJECT_ID;
use crate::domain::project::ProjectMeta;

pub const CONFIG_FILE: &str = "config.json";
pub const CONFIG_VERSION: &str = "1.0.0";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_active_project")]
    pub active_project: String,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub projects: Vec<ProjectMeta>,
    /// Compiler API settings.
    #[serde(default)]
    pub compiler: CompilerApiConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            active_project: default_active_project(),
            defaults: Defaults::default(),
            projects: vec![default_project_meta()],
            compiler: CompilerApiConfig::default(),
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.defaults.model.trim().is_empty() {
            return Err(AppError::InvalidConfig("defaults.model must not be empty".to_string()));
        }
        if self.project(&self.active_project).is_none() {
            return Err(AppError::InvalidConfig(format!(
                "activeProject '{}' is not a registered project",
                self.active_project
            )));
        }
        self.compiler.validate()
    }

    /// Point a dangling `activeProject` back at `default`, registering the
    /// default project if it is missing too. Returns the dropped id.
    pub fn repair_active_project(&mut self) -> Option<String> {
        if self.project(&self.active_project).is_some() {
            return None;
        }
        if self.project(DEFAULT_PROJECT_ID).is_none() {
            self.projects.insert(0, default_project_meta());
        }
        Some(std::mem::replace(&mut self.active_project, default_active_project()))
    }

    pub fn project(&self, id: &str) -> Option<&ProjectMeta> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_mut(&mut self, id: &str) -> Option<&mut ProjectMeta> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Apply a partial update. Absent fields keep their current value.
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(active_project) = update.active_project {
            self.active_project = active_project;
        }
        if let Some(output_mode) = update.output_mode {
            self.defaults.output_mode = output_mode;
        }
        if let Some(model) = update.model {
            self.defaults.model = model;
        }
    }
}

/// Defaults applied when a request does not say otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    #[serde(default)]
    pub output_mode: OutputMode,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self { output_mode: OutputMode::default(), model: default_model() }
    }
}

/// Compiler API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerApiConfig {
    /// Responses endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum attempts per request.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between retries in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CompilerApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl CompilerApiConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("timeoutSecs must be greater than 0".to_string()));
        }
        if self.max_retries == 0 {
            return Err(AppError::InvalidConfig("maxRetries must be greater than 0".to_string()));
        }
        if self.retry_delay_ms == 0 {
            return Err(AppError::InvalidConfig(
                "retryDelayMs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial configuration update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub active_project: Option<String>,
    pub output_mode: Option<OutputMode>,
    pub model: Option<String>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.active_project.is_none() && self.output_mode.is_none() && self.model.is_none()
    }
}

fn default_project_meta() -> ProjectMeta {
    ProjectMeta {
        id: DEFAULT_PROJECT_ID.to_string(),
        name: "Default Project".to_string(),
        description: Some(String::new()),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn default_active_project() -> String {
    DEFAULT_PROJECT_ID.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_url() -> Url {
    Url::parse("https://api.openai.com/v1/responses").expect("Default API URL must be valid")
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}
