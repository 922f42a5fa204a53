//! LLM API interaction.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait defining async LLM interaction
//! - [`OpenAiChat`]: OpenAI-compatible `chat/completions` client
//! - [`ask_logged`]: times a single call and logs its outcome
//!
//! Calls are made once. A failure is returned to the caller, which reports it
//! and leaves the session as it was; the user retries by hand.

use crate::config::Settings;
use crate::error::{LinkcraftError, Result};
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

const SERVICE: &str = "OpenAI";

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a text-generation model and return the
/// generated text.
pub trait AskAsync {
    /// Send `prompt` to the model and receive its reply.
    async fn ask(&self, prompt: &str) -> Result<String>;
}

/// Client for an OpenAI-compatible chat completions endpoint with a fixed
/// model and temperature.
pub struct OpenAiChat {
    client: Client,
    api_key: String,
    endpoint: Url,
    model: String,
    temperature: f32,
}

impl fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiChat {
    pub fn new(client: Client, settings: &Settings) -> Result<Self> {
        let endpoint = settings
            .openai_api_url
            .join("chat/completions")
            .map_err(|source| LinkcraftError::InvalidUrl {
                what: "OpenAI API",
                source,
            })?;
        Ok(Self {
            client,
            api_key: settings.openai_api_key.clone(),
            endpoint,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl AskAsync for OpenAiChat {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(%status, body = %truncate_for_log(&text, 300), "Chat completion response");
        decode_completion(status, &text)
    }
}

/// Extract the first choice's text from a chat completion response.
fn decode_completion(status: StatusCode, body: &str) -> Result<String> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| format!("HTTP {status}"));
        return Err(LinkcraftError::ExternalService {
            service: SERVICE,
            message,
        });
    }

    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| LinkcraftError::ExternalService {
            service: SERVICE,
            message: format!("unreadable response: {e}"),
        })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LinkcraftError::ExternalService {
            service: SERVICE,
            message: "response contained no choices".to_string(),
        })
}

/// Send one prompt and log how long it took and whether it worked.
#[instrument(level = "info", skip(llm, prompt))]
pub async fn ask_logged<A: AskAsync>(llm: &A, purpose: &str, prompt: &str) -> Result<String> {
    let t0 = Instant::now();
    let res = llm.ask(prompt).await;
    let dt = t0.elapsed();

    match &res {
        Ok(reply) => info!(
            elapsed_ms = dt.as_millis() as u64,
            reply_chars = reply.chars().count(),
            "LLM call succeeded"
        ),
        Err(e @ LinkcraftError::Http(_)) => {
            error!(elapsed_ms = dt.as_millis() as u64, error = %e, "LLM transport failed")
        }
        Err(e) => warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "LLM call failed"),
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, Overrides, SecretsFile};

    #[test]
    fn test_decode_first_choice() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "🚀 Big news!"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        assert_eq!(decode_completion(StatusCode::OK, body).unwrap(), "🚀 Big news!");
    }

    #[test]
    fn test_decode_no_choices() {
        let err = decode_completion(StatusCode::OK, r#"{"choices": []}"#).unwrap_err();
        assert_eq!(err.to_string(), "OpenAI error: response contained no choices");
    }

    #[test]
    fn test_decode_provider_error_message() {
        let body = r#"{"error": {"message": "You exceeded your current quota", "type": "insufficient_quota"}}"#;
        let err = decode_completion(StatusCode::TOO_MANY_REQUESTS, body).unwrap_err();
        assert_eq!(err.to_string(), "OpenAI error: You exceeded your current quota");
    }

    #[test]
    fn test_decode_plain_error_status() {
        let err = decode_completion(StatusCode::INTERNAL_SERVER_ERROR, "oops").unwrap_err();
        assert_eq!(err.to_string(), "OpenAI error: HTTP 500 Internal Server Error");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            temperature: 0.5,
            messages: [ChatMessage {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_endpoint_from_settings() {
        let settings = resolve(
            SecretsFile::default(),
            Overrides {
                news_api_key: Some("n".to_string()),
                openai_api_key: Some("o".to_string()),
                ..Overrides::default()
            },
        )
        .unwrap();
        let chat = OpenAiChat::new(Client::new(), &settings).unwrap();
        assert_eq!(chat.endpoint.as_str(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(chat.model, "gpt-4o-mini");
    }
}
