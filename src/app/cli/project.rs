//! Project commands.

use clap::Subcommand;
use serde_json::json;

use super::Global;
use crate::app::api::{self, CreateProjectInput, UpdateProjectInput};
use crate::domain::{AppError, Project};

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List registered projects
    #[clap(visible_alias = "ls")]
    List,
    /// Show a project and its core document (the active project by default)
    Show {
        /// Project ID
        id: Option<String>,
    },
    /// Register a new project
    Create {
        /// Project ID (lowercase letters, digits, hyphens)
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        purpose: Option<String>,
        #[arg(long)]
        principles: Option<String>,
        #[arg(long)]
        direction: Option<String>,
    },
    /// Update project metadata or core sections
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        purpose: Option<String>,
        #[arg(long)]
        principles: Option<String>,
        #[arg(long)]
        direction: Option<String>,
    },
    /// Delete a project and its files
    #[clap(visible_alias = "rm")]
    Delete { id: String },
    /// Make a project the active one
    Use { id: String },
}

pub fn run(global: &Global, command: ProjectCommands) -> Result<(), AppError> {
    let data_dir = global.data_dir();
    match command {
        ProjectCommands::List => {
            let config = api::config_show(data_dir)?;
            let projects = api::project_list(data_dir)?;
            global.emit(&projects, |projects| {
                for meta in projects {
                    let marker = if meta.id == config.active_project { "*" } else { " " };
                    println!("{} {} - {}", marker, meta.id, meta.name);
                }
            })
        }
        ProjectCommands::Show { id } => {
            let project = match id {
                Some(id) => api::project_get(data_dir, &id)?,
                None => api::project_active(data_dir)?,
            };
            global.emit(&project, print_project)
        }
        ProjectCommands::Create { id, name, description, purpose, principles, direction } => {
            let input =
                CreateProjectInput { id, name, description, purpose, principles, direction };
            let project = api::project_create(data_dir, input)?;
            global.emit(&project, |project| {
                println!("✅ Created project '{}'", project.meta.id);
            })
        }
        ProjectCommands::Update { id, name, description, purpose, principles, direction } => {
            let input = UpdateProjectInput { name, description, purpose, principles, direction };
            let project = api::project_update(data_dir, &id, input)?;
            global.emit(&project, |project| {
                println!("✅ Updated project '{}'", project.meta.id);
            })
        }
        ProjectCommands::Delete { id } => {
            api::project_delete(data_dir, &id)?;
            global.emit(&json!({ "deleted": id }), |_| {
                println!("✅ Deleted project '{}'", id);
            })
        }
        ProjectCommands::Use { id } => {
            let project = api::project_use(data_dir, &id)?;
            global.emit(&project, |project| {
                println!("✅ Active project is now '{}'", project.meta.id);
            })
        }
    }
}

fn print_project(project: &Project) {
    println!("{} ({})", project.meta.name, project.meta.id);
    if let Some(description) = project.meta.description.as_deref().filter(|d| !d.is_empty()) {
        println!("{}", description);
    }
    println!();
    println!("{}", project.core.raw);
}
