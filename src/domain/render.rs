//! Rendering of the embedded document templates.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::domain::AppError;

pub(crate) const AGENT_TEMPLATE: (&str, &str) =
    ("agent.md", include_str!("../assets/documents/agent.md.j2"));
pub(crate) const PROJECT_CORE_TEMPLATE: (&str, &str) =
    ("project.core.md", include_str!("../assets/documents/project.core.md.j2"));
pub(crate) const COMPILER_INSTRUCTION_TEMPLATE: (&str, &str) =
    ("compiler_instruction", include_str!("../assets/documents/compiler_instruction.j2"));

/// Render one of the embedded templates with `context`.
///
/// Undefined variables are errors, so a template referring to a field the
/// context does not carry fails loudly instead of rendering blank text.
pub(crate) fn render(template: (&str, &str), context: impl Serialize) -> Result<String, AppError> {
    let (name, source) = template;
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    env.render_str(source, context).map_err(|err| AppError::TemplateRender {
        template: name.to_string(),
        reason: err.to_string(),
    })
}
