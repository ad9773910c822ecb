//! Config commands.

use clap::Subcommand;

use super::Global;
use crate::app::api;
use crate::domain::{AppError, ConfigUpdate, OutputMode, SystemConfig};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Change configuration defaults
    Set {
        #[arg(long)]
        active_project: Option<String>,
        /// Default output mode (prompt, prompt+md)
        #[arg(long)]
        output_mode: Option<OutputMode>,
        /// Default compiler model
        #[arg(long)]
        model: Option<String>,
    },
}

pub fn run(global: &Global, command: ConfigCommands) -> Result<(), AppError> {
    let data_dir = global.data_dir();
    match command {
        ConfigCommands::Show => {
            let config = api::config_show(data_dir)?;
            global.emit(&config, print_config)
        }
        ConfigCommands::Set { active_project, output_mode, model } => {
            let update = ConfigUpdate { active_project, output_mode, model };
            if update.is_empty() {
                return Err(AppError::validation(
                    "Nothing to update. Pass --active-project, --output-mode, or --model.",
                ));
            }
            let config = api::config_update(data_dir, update)?;
            global.emit(&config, |config| {
                println!("✅ Configuration updated");
                print_config(config);
            })
        }
    }
}

fn print_config(config: &SystemConfig) {
    println!("Active project: {}", config.active_project);
    println!("Output mode:    {}", config.defaults.output_mode);
    println!("Model:          {}", config.defaults.model);
    println!("Compiler API:   {}", config.compiler.api_url);
    println!("Projects:       {}", config.projects.len());
}
