/// A template document and where it came from.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    /// File name or catalog path, used in messages.
    pub origin: String,
    /// File content as UTF-8 text.
    pub content: String,
}

/// Port for agent templates compiled into the binary.
pub trait TemplateCatalog {
    fn builtin_templates(&self) -> Vec<TemplateFile>;
}
