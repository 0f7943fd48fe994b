/// LLM Client: the single point of entry for all Claude API calls in tailor.
///
/// Generation, revision, company detection and both reviewers go through
/// `LlmClient::call_text`. Nothing else talks to the Anthropic API.
///
/// Model: claude-sonnet-4-5 (hardcoded so every run is scored by the same model)
use std::time::Duration;

use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 8192;
const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_secs(1);
/// Upper bound on a server-requested `retry-after`.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    /// All text blocks joined in order.
    fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Outcome of a single HTTP attempt.
enum Attempt {
    Done(MessagesResponse),
    Retry { error: LlmError, wait: Option<Duration> },
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
        })
    }

    /// Sends one user prompt and returns the trimmed reply text.
    /// Transport errors, 429 and 5xx are retried with exponential backoff (or
    /// the server's `retry-after`, when it sends one).
    pub async fn call_text(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(&request).await? {
                Attempt::Done(response) => return reply_text(&response),
                Attempt::Retry { error, wait } => {
                    last = error.to_string();
                    if attempt == MAX_ATTEMPTS {
                        break;
                    }
                    let delay = wait.unwrap_or_else(|| backoff_delay(attempt));
                    warn!(
                        "LLM call attempt {attempt}/{MAX_ATTEMPTS} failed ({last}); retrying in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
            last,
        })
    }

    /// `Err` only for failures a retry cannot fix.
    async fn attempt(&self, request: &MessagesRequest<'_>) -> Result<Attempt, LlmError> {
        let response = match self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return Ok(Attempt::Retry {
                    error: LlmError::Http(e),
                    wait: None,
                })
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(Attempt::Done(response.json().await?));
        }

        let wait = retry_after(&response);
        let error = LlmError::Api {
            status: status.as_u16(),
            message: error_message(response).await,
        };
        if is_retryable(status) {
            Ok(Attempt::Retry { error, wait })
        } else {
            Err(error)
        }
    }
}

fn reply_text(response: &MessagesResponse) -> Result<String, LlmError> {
    debug!(
        "LLM call succeeded: input_tokens={}, output_tokens={}",
        response.usage.input_tokens, response.usage.output_tokens
    );
    if response.stop_reason.as_deref() == Some("max_tokens") {
        warn!("LLM reply was cut off at {MAX_TOKENS} tokens");
    }
    let text = response.joined_text();
    let text = text.trim();
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(text.to_string())
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// 1s, 2s, 4s, ... for attempts 1, 2, 3, ...
fn backoff_delay(attempt: u32) -> Duration {
    BASE_BACKOFF * 2u32.saturating_pow(attempt.saturating_sub(1))
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after)
}

fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: u64 = value.trim().parse().ok()?;
    Some(Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

/// The API's `error.message` when the body carries one, else the raw body.
async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

const FENCE_TAGS: [&str; 4] = ["```json", "```yaml", "```yml", "```"];

/// Strips a surrounding ```yaml / ```json / ``` code fence from model output.
/// Text without a leading fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    for tag in FENCE_TAGS {
        if let Some(stripped) = text.strip_prefix(tag) {
            let stripped = stripped.trim_start();
            return stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped);
        }
    }
    text
}
