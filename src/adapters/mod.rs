pub mod builtin_templates;
pub mod data_filesystem;
pub mod openai_client_http;
pub mod openai_client_retrying;

pub use builtin_templates::EmbeddedTemplateCatalog;
pub use data_filesystem::FilesystemDataStore;
pub use openai_client_http::HttpOpenAiClient;
pub use openai_client_retrying::{RetryPolicy, RetryingCompletionClient};
