use std::sync::{Arc, Mutex};

use crate::domain::AppError;
use crate::ports::{CompletionClient, CompletionRequest, CompletionResponse};

/// Completion client that records requests and answers with fixed text.
#[derive(Clone)]
pub struct FakeCompletionClient {
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    pub output_text: String,
}

impl FakeCompletionClient {
    pub fn new(output_text: impl Into<String>) -> Self {
        Self { requests: Arc::new(Mutex::new(vec![])), output_text: output_text.into() }
    }

    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionClient for FakeCompletionClient {
    fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AppError> {
        self.requests.lock().unwrap().push(request);
        Ok(CompletionResponse { output_text: self.output_text.clone() })
    }
}
