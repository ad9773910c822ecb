//! Template commands.

use clap::Subcommand;

use super::Global;
use crate::app::api;
use crate::domain::AppError;

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List agent templates
    #[clap(visible_alias = "ls")]
    List {
        /// Group templates by category
        #[arg(long)]
        by_category: bool,
    },
    /// Show a template document
    Show { id: String },
}

pub fn run(global: &Global, command: TemplateCommands) -> Result<(), AppError> {
    let data_dir = global.data_dir();
    match command {
        TemplateCommands::List { by_category: true } => {
            let groups = api::template_list_by_category(data_dir)?;
            global.emit(&groups, |groups| {
                for (category, templates) in groups {
                    println!("{}:", category);
                    for template in templates {
                        println!("  {} - {}", template.template_id, template.description);
                    }
                }
            })
        }
        TemplateCommands::List { by_category: false } => {
            let templates = api::template_list(data_dir)?;
            global.emit(&templates, |templates| {
                for template in templates {
                    println!(
                        "{} - {} [{}]",
                        template.template_id,
                        template.name,
                        template.group()
                    );
                }
            })
        }
        TemplateCommands::Show { id } => {
            let template = api::template_get(data_dir, &id)?;
            global.emit(&template, |template| println!("{}", template.content))
        }
    }
}
