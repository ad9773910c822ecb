mod fake_completion_client;
mod memory_data_store;

pub use fake_completion_client::FakeCompletionClient;
pub use memory_data_store::MemoryDataStore;

use crate::ports::{TemplateCatalog, TemplateFile};

/// Template catalog with a fixed set of documents.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateCatalog {
    pub files: Vec<TemplateFile>,
}

impl StaticTemplateCatalog {
    pub fn with(mut self, origin: &str, content: &str) -> Self {
        self.files.push(TemplateFile { origin: origin.to_string(), content: content.to_string() });
        self
    }
}

impl TemplateCatalog for StaticTemplateCatalog {
    fn builtin_templates(&self) -> Vec<TemplateFile> {
        self.files.clone()
    }
}
