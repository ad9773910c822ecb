mod completion_client;
mod data_store;
mod template_catalog;

pub use completion_client::{
    CompletionClient, CompletionMessage, CompletionRequest, CompletionResponse, MessageRole,
};
pub use data_store::DataStore;
pub use template_catalog::{TemplateCatalog, TemplateFile};
