pub mod agent_id;
pub mod project_id;
pub mod validation;

pub use agent_id::AgentId;
pub use project_id::{DEFAULT_PROJECT_ID, ProjectId};
