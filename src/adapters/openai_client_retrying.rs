//! Retry wrapper for compiler model calls.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::adapters::openai_client_http::BODY_READ_FAILED;
use crate::domain::{AppError, CompilerApiConfig};
use crate::ports::{CompletionClient, CompletionRequest, CompletionResponse};

const MAX_BACKOFF: Duration = Duration::from_secs(30);
const RETRY_AFTER_HINT: &str = "retry_after_ms=";
const LOG_MESSAGE_LIMIT: usize = 512;
const TRANSIENT_HINTS: &[&str] = &["timeout", "timed out", "connect", "temporary"];

/// How many times to call the compiler and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CompilerApiConfig) -> Self {
        let initial_delay = Duration::from_millis(config.retry_delay_ms.max(1));
        Self {
            max_attempts: config.max_retries.max(1),
            initial_delay,
            max_delay: MAX_BACKOFF.max(initial_delay),
        }
    }

    /// Exponential backoff for the `retry`-th retry (1-based), capped.
    fn backoff(&self, retry: u32) -> Duration {
        let factor = 1_u32 << retry.saturating_sub(1).min(6);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Wait before the next attempt; a server hint replaces the backoff.
    fn delay_before(&self, retry: u32, error: &AppError) -> Duration {
        if let Some(hint) = retry_after_hint(error) {
            return hint.min(self.max_delay);
        }
        let backoff = self.backoff(retry);
        (backoff + jitter(backoff / 4)).min(self.max_delay)
    }
}

/// Calls the wrapped client again after transient failures.
pub struct RetryingCompletionClient {
    inner: Box<dyn CompletionClient>,
    policy: RetryPolicy,
}

impl RetryingCompletionClient {
    pub fn new(inner: Box<dyn CompletionClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl CompletionClient for RetryingCompletionClient {
    fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AppError> {
        let mut attempt = 1;
        loop {
            let error = match self.inner.complete(request.clone()) {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };
            if attempt >= self.policy.max_attempts || !is_transient(&error) {
                return Err(error);
            }

            let delay = self.policy.delay_before(attempt, &error);
            warn!(
                attempt,
                max_attempts = self.policy.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %describe_for_log(&error),
                "compiler request failed, retrying"
            );
            thread::sleep(delay);
            attempt += 1;
        }
    }
}

/// Rate limits, timeouts, server errors, and transport failures are worth
/// another attempt. Other HTTP statuses are final.
fn is_transient(error: &AppError) -> bool {
    let AppError::CompletionApi { message, status } = error else {
        return false;
    };
    match status {
        Some(429 | 408) => true,
        Some(code) => *code >= 500,
        None if message.starts_with(BODY_READ_FAILED) => true,
        None => {
            let message = message.to_ascii_lowercase();
            TRANSIENT_HINTS.iter().any(|hint| message.contains(hint))
        }
    }
}

fn retry_after_hint(error: &AppError) -> Option<Duration> {
    let AppError::CompletionApi { message, .. } = error else {
        return None;
    };
    let (_, tail) = message.split_once(RETRY_AFTER_HINT)?;
    let digits = tail.split(|c: char| !c.is_ascii_digit()).next()?;
    digits.parse().ok().map(Duration::from_millis)
}

fn jitter(limit: Duration) -> Duration {
    let limit_ms = limit.as_millis() as u64;
    if limit_ms == 0 {
        return Duration::ZERO;
    }
    let random = RandomState::new().build_hasher().finish();
    Duration::from_millis(random % limit_ms)
}

/// One-line, bounded rendering of an error for log output.
fn describe_for_log(error: &AppError) -> String {
    let (status, message) = match error {
        AppError::CompletionApi { message, status } => (*status, message.clone()),
        other => (None, other.to_string()),
    };

    let mut line = message
        .chars()
        .take(LOG_MESSAGE_LIMIT)
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if message.chars().count() > LOG_MESSAGE_LIMIT {
        line.push_str(" [truncated]");
    }

    match status {
        Some(code) => format!("status={}: {}", code, line),
        None => line,
    }
}
