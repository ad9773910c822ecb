//! CLI Adapter.

mod agent;
mod config;
mod generate;
mod project;
mod template;

use std::io::ErrorKind;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::app::logging;
use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "vibeprompt")]
#[command(version)]
#[command(
    about = "Compose project and sub-agent context into prompts for vibe coding",
    long_about = None
)]
struct Cli {
    /// Data directory (defaults to $VIBEPROMPT_DATA_DIR, then ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects and their core documents
    #[clap(visible_alias = "p")]
    Project {
        #[command(subcommand)]
        command: project::ProjectCommands,
    },
    /// Manage sub-agent definitions
    #[clap(visible_alias = "a")]
    Agent {
        #[command(subcommand)]
        command: agent::AgentCommands,
    },
    /// Browse agent templates
    #[clap(visible_alias = "t")]
    Template {
        #[command(subcommand)]
        command: template::TemplateCommands,
    },
    /// Show or change system configuration
    #[clap(visible_alias = "c")]
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
    /// Generate a prompt from the project, selected agents, and a change request
    #[clap(visible_alias = "g")]
    Generate(generate::GenerateArgs),
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Shared options for command handlers.
pub(crate) struct Global {
    pub data_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Global {
    pub fn data_dir(&self) -> Option<&std::path::Path> {
        self.data_dir.as_deref()
    }

    /// Print `value` as JSON in JSON mode; otherwise run the text printer.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(value)?);
            }
            OutputFormat::Text => text(value),
        }
        Ok(())
    }
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    logging::init();

    let global = Global { data_dir: cli.data_dir, format: cli.format };
    let result: Result<(), AppError> = match cli.command {
        Commands::Project { command } => project::run(&global, command),
        Commands::Agent { command } => agent::run(&global, command),
        Commands::Template { command } => template::run(&global, command),
        Commands::Config { command } => config::run(&global, command),
        Commands::Generate(args) => generate::run(&global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &AppError) -> i32 {
    match err.kind() {
        ErrorKind::InvalidInput => 2,
        _ => 1,
    }
}
