//! Agent commands.

use std::io::IsTerminal;

use clap::Subcommand;
use dialoguer::Select;
use serde_json::json;

use super::Global;
use crate::app::api::{self, CreateAgentInput, UpdateAgentInput};
use crate::domain::{Agent, AppError};

#[derive(Subcommand)]
pub enum AgentCommands {
    /// List agents of a project
    #[clap(visible_alias = "ls")]
    List {
        /// Project ID (defaults to the active project)
        #[arg(short = 'p', long)]
        project: Option<String>,
        /// Print agent IDs only
        #[arg(long)]
        ids: bool,
    },
    /// Show one agent
    Show {
        id: String,
        #[arg(short = 'p', long)]
        project: Option<String>,
    },
    /// Create an agent file
    Create {
        /// Agent ID (lowercase letters, digits, dots, hyphens)
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "")]
        design_decisions: String,
        #[arg(long, default_value = "")]
        constraints: String,
        #[arg(long)]
        prompt_blueprint: Option<String>,
        #[arg(short = 'p', long)]
        project: Option<String>,
    },
    /// Update agent sections; an empty value clears or resets a section
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        design_decisions: Option<String>,
        #[arg(long)]
        constraints: Option<String>,
        #[arg(long)]
        prompt_blueprint: Option<String>,
        #[arg(short = 'p', long)]
        project: Option<String>,
    },
    /// Delete an agent file
    #[clap(visible_alias = "rm")]
    Delete {
        id: String,
        #[arg(short = 'p', long)]
        project: Option<String>,
    },
    /// Create an agent from a template
    FromTemplate {
        /// Template ID (prompted for on a terminal when omitted)
        template: Option<String>,
        /// New agent ID
        #[arg(long)]
        id: String,
        /// New agent display name
        #[arg(long)]
        name: String,
        #[arg(short = 'p', long)]
        project: Option<String>,
    },
}

pub fn run(global: &Global, command: AgentCommands) -> Result<(), AppError> {
    let data_dir = global.data_dir();
    match command {
        AgentCommands::List { project, ids: true } => {
            let ids = api::agent_ids(data_dir, project.as_deref())?;
            global.emit(&ids, |ids| {
                for id in ids {
                    println!("{}", id);
                }
            })
        }
        AgentCommands::List { project, ids: false } => {
            let agents = api::agent_list(data_dir, project.as_deref())?;
            global.emit(&agents, |agents| {
                if agents.is_empty() {
                    println!("No agents found");
                }
                for agent in agents {
                    match &agent.category {
                        Some(category) => println!("{} - {} [{}]", agent.id, agent.name, category),
                        None => println!("{} - {}", agent.id, agent.name),
                    }
                }
            })
        }
        AgentCommands::Show { id, project } => {
            let agent = api::agent_get(data_dir, &id, project.as_deref())?;
            global.emit(&agent, |agent| println!("{}", agent.raw))
        }
        AgentCommands::Create {
            id,
            name,
            role,
            category,
            design_decisions,
            constraints,
            prompt_blueprint,
            project,
        } => {
            let input = CreateAgentInput {
                id,
                name,
                category,
                role,
                design_decisions,
                constraints,
                prompt_blueprint,
            };
            let agent = api::agent_create(data_dir, input, project.as_deref())?;
            global.emit(&agent, print_created)
        }
        AgentCommands::Update {
            id,
            name,
            category,
            role,
            design_decisions,
            constraints,
            prompt_blueprint,
            project,
        } => {
            let input = UpdateAgentInput {
                name,
                category,
                role,
                design_decisions,
                constraints,
                prompt_blueprint,
            };
            let agent = api::agent_update(data_dir, &id, input, project.as_deref())?;
            global.emit(&agent, |agent| println!("✅ Updated agent '{}'", agent.id))
        }
        AgentCommands::Delete { id, project } => {
            api::agent_delete(data_dir, &id, project.as_deref())?;
            global.emit(&json!({ "deleted": id }), |_| {
                println!("✅ Deleted agent '{}'", id);
            })
        }
        AgentCommands::FromTemplate { template, id, name, project } => {
            let template_id = match template {
                Some(value) => value,
                None => match prompt_template(global)? {
                    Some(value) => value,
                    None => return Ok(()),
                },
            };
            let agent =
                api::agent_from_template(data_dir, &template_id, &id, &name, project.as_deref())?;
            global.emit(&agent, print_created)
        }
    }
}

fn print_created(agent: &Agent) {
    println!("✅ Created agent '{}' ({})", agent.id, agent.name);
}

fn prompt_template(global: &Global) -> Result<Option<String>, AppError> {
    if !std::io::stdin().is_terminal() {
        return Err(AppError::validation("Template ID is required when not running interactively"));
    }

    let templates = api::template_list(global.data_dir())?;
    if templates.is_empty() {
        return Err(AppError::validation("No agent templates available"));
    }

    let items: Vec<String> = templates
        .iter()
        .map(|t| format!("[{}] {}: {}", t.group(), t.name, t.description))
        .collect();
    let selection = Select::new()
        .with_prompt("Select template")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|err| AppError::Validation(format!("Failed to select template: {}", err)))?;

    Ok(selection.map(|index| templates[index].template_id.clone()))
}
