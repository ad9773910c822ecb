//! Generate command.

use std::io::Read;

use clap::Args;

use super::Global;
use crate::app::api::{self, GenerateOptions, GenerateOutput};
use crate::domain::compose::DOC_MARKER;
use crate::domain::{AppError, GenerateRequest, OutputMode, Scope};

#[derive(Args)]
pub struct GenerateArgs {
    /// Change request text; read from stdin when omitted or "-"
    #[arg(short = 'i', long)]
    input: Option<String>,
    /// Context scope (project, agent)
    #[arg(short = 's', long, default_value = "project")]
    scope: Scope,
    /// Agent ID to include; repeat for several agents
    #[arg(short = 'a', long = "agent")]
    agents: Vec<String>,
    /// Output mode (prompt, prompt+md); defaults to the configured mode
    #[arg(short = 'm', long)]
    mode: Option<OutputMode>,
    /// Project to read (defaults to the active project)
    #[arg(short = 'p', long)]
    project: Option<String>,
    /// Compiler model (overrides OPENAI_MODEL and the configured default)
    #[arg(long)]
    model: Option<String>,
    /// Print the composed base prompt without calling the compiler
    #[arg(long)]
    base_only: bool,
}

pub fn run(global: &Global, args: GenerateArgs) -> Result<(), AppError> {
    let user_input = match args.input {
        Some(text) if text != "-" => text,
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let request = GenerateRequest {
        scope: args.scope,
        selected_agents: args.agents,
        user_input,
        output_mode: args.mode,
    };
    let options =
        GenerateOptions { project: args.project, model: args.model, base_only: args.base_only };

    let output = api::generate(global.data_dir(), &request, &options)?;
    global.emit(&output, print_output)
}

fn print_output(output: &GenerateOutput) {
    println!("{}", output.generated_prompt.trim_end());
    if let Some(doc) = &output.generated_doc {
        println!();
        println!("{}", DOC_MARKER);
        println!("{}", doc.trim_end());
    }
}
