//! Compiler model client for the OpenAI Responses API, using reqwest.

use std::error::Error as _;
use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::domain::{AppError, CompilerApiConfig};
use crate::ports::{CompletionClient, CompletionMessage, CompletionRequest, CompletionResponse};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Prefix of the error raised when a reply body is cut off mid-read.
pub(crate) const BODY_READ_FAILED: &str = "Failed to read response body";

/// Read the API key, treating an empty value as unset.
pub fn api_key_from_env() -> Result<String, AppError> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(AppError::EnvironmentVariableMissing(API_KEY_ENV.into())),
    }
}

/// Bearer token that never shows up in debug output.
#[derive(Clone)]
struct ApiKey(String);

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// One POST per call; retries live in `RetryingCompletionClient`.
#[derive(Debug, Clone)]
pub struct HttpOpenAiClient {
    api_key: ApiKey,
    api_url: Url,
    client: Client,
}

impl HttpOpenAiClient {
    pub fn new(api_key: String, config: &CompilerApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| transport_error("Failed to create HTTP client", e))?;

        Ok(Self { api_key: ApiKey(api_key), api_url: config.api_url.clone(), client })
    }

    fn post(&self, body: &ResponsesRequest<'_>) -> Result<Response, AppError> {
        debug!(url = %self.api_url, model = body.model, "sending compiler request");
        self.client
            .post(self.api_url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.0))
            .json(body)
            .send()
            .map_err(|e| transport_error("HTTP request failed", e))
    }
}

impl CompletionClient for HttpOpenAiClient {
    fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AppError> {
        let payload = ResponsesRequest { model: &request.model, input: &request.messages };
        let response = self.post(&payload)?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok()?.trim().parse::<u64>().ok());
        let body = response.text().map_err(|e| transport_error(BODY_READ_FAILED, e))?;
        debug!(status = status.as_u16(), bytes = body.len(), "compiler response received");

        if !status.is_success() {
            return Err(status_error(status, &body, retry_after));
        }

        let parsed: ResponsesBody =
            serde_json::from_str(&body).map_err(|e| AppError::CompletionApi {
                message: format!("Failed to parse response: {}", e),
                status: Some(status.as_u16()),
            })?;
        Ok(CompletionResponse { output_text: parsed.into_text() })
    }
}

/// Transport failures carry no status. The message includes the error's
/// source chain so timeouts and resets stay recognizable.
fn transport_error(context: &str, err: reqwest::Error) -> AppError {
    let mut message = format!("{}: {}", context, err);
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    AppError::CompletionApi { message, status: None }
}

/// Build the error for a non-2xx reply. A `Retry-After` header (seconds) is
/// carried in the message as `retry_after_ms=<n>` for the retry wrapper.
fn status_error(status: StatusCode, body: &str, retry_after_secs: Option<u64>) -> AppError {
    let mut message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(ErrorDetail { message }), .. }) => message,
        Ok(ErrorBody { message: Some(message), .. }) => message,
        _ if !body.trim().is_empty() => body.to_string(),
        _ if status == StatusCode::TOO_MANY_REQUESTS => "Rate limited".to_string(),
        _ if status.is_server_error() => "Server error".to_string(),
        _ => "Compiler API request failed".to_string(),
    };
    if let Some(secs) = retry_after_secs {
        message.push_str(&format!(" (retry_after_ms={})", secs.saturating_mul(1000)));
    }
    AppError::CompletionApi { message, status: Some(status.as_u16()) }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [CompletionMessage],
}

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesBody {
    /// The aggregated `output_text`, or the `output_text` parts of the
    /// message items joined together when the aggregate is absent.
    fn into_text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }
        self.output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config_for(server: &mockito::Server) -> CompilerApiConfig {
        CompilerApiConfig {
            api_url: Url::parse(&format!("{}/v1/responses", server.url())).unwrap(),
            max_retries: 3,
            retry_delay_ms: 1,
            timeout_secs: 1,
        }
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                CompletionMessage::system("be careful"),
                CompletionMessage::user("compile this"),
            ],
        }
    }

    #[test]
    fn complete_sends_model_and_messages() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/responses")
            .match_header("authorization", "Bearer fake-key")
            .match_body(Matcher::Json(json!({
                "model": "gpt-4o-mini",
                "input": [
                    { "role": "system", "content": "be careful" },
                    { "role": "user", "content": "compile this" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"output_text": "===PROMPT===\nDo it"}"#)
            .create();

        let client = HttpOpenAiClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        let response = client.complete(test_request()).unwrap();
        assert_eq!(response.output_text, "===PROMPT===\nDo it");
        mock.assert();
    }

    #[test]
    fn complete_collects_text_from_output_items() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", "/v1/responses")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"output": [
                    {"type": "reasoning", "content": []},
                    {"type": "message", "content": [
                        {"type": "output_text", "text": "first "},
                        {"type": "refusal", "refusal": "no"},
                        {"type": "output_text", "text": "second"}
                    ]}
                ]}"#,
            )
            .create();

        let client = HttpOpenAiClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        assert_eq!(client.complete(test_request()).unwrap().output_text, "first second");
    }

    #[test]
    fn complete_returns_server_error_on_500() {
        let mut server = mockito::Server::new();
        let mock = server.mock("POST", "/v1/responses").with_status(500).expect(1).create();

        let client = HttpOpenAiClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        match client.complete(test_request()).unwrap_err() {
            AppError::CompletionApi { message, status } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "Server error");
            }
            other => panic!("unexpected error: {}", other),
        }
        mock.assert();
    }

    #[test]
    fn rate_limit_carries_retry_after() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/responses")
            .with_status(429)
            .with_header("retry-after", "2")
            .create();

        let client = HttpOpenAiClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        match client.complete(test_request()).unwrap_err() {
            AppError::CompletionApi { message, status } => {
                assert_eq!(status, Some(429));
                assert_eq!(message, "Rate limited (retry_after_ms=2000)");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn parses_nested_error_message() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/responses")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .expect(1)
            .create();

        let client = HttpOpenAiClient::new("fake-key".to_string(), &config_for(&server)).unwrap();
        match client.complete(test_request()).unwrap_err() {
            AppError::CompletionApi { message, status } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn stalled_body_is_a_transport_error() {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0_u8; 4096];
            let _ = stream.read(&mut buf);
            stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\n{\"output_text\"")
                .unwrap();
            stream.flush().unwrap();
            // hold the connection open so the body read hits the client timeout
            std::thread::sleep(Duration::from_secs(3));
        });

        let config = CompilerApiConfig {
            api_url: Url::parse(&format!("http://{}/v1/responses", addr)).unwrap(),
            timeout_secs: 1,
            ..CompilerApiConfig::default()
        };
        let client = HttpOpenAiClient::new("fake-key".to_string(), &config).unwrap();
        match client.complete(test_request()).unwrap_err() {
            AppError::CompletionApi { message, status } => {
                assert_eq!(status, None);
                assert!(message.starts_with(BODY_READ_FAILED), "message: {}", message);
            }
            other => panic!("unexpected error: {}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn debug_output_redacts_key() {
        let client =
            HttpOpenAiClient::new("sk-secret".to_string(), &CompilerApiConfig::default()).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));
    }
}
