//! OpenAI-style chat completions.
//!
//! Shared by every provider exposing a `/chat/completions` endpoint with
//! bearer-token auth: OpenAI, Groq (`/openai/v1`) and Mistral.

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use super::types::Prompt;
use super::WireFormat;

pub struct ChatCompletions;

// ── Request/response types ──────────────────────────────────────────

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<MessageResponse>,
}

#[derive(Deserialize)]
struct MessageResponse {
    content: Option<String>,
}

// ── WireFormat implementation ───────────────────────────────────────

impl WireFormat for ChatCompletions {
    fn headers(&self, credential: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", credential))?,
        );
        Ok(headers)
    }

    fn payload(&self, model: &str, prompt: &Prompt<'_>) -> serde_json::Result<serde_json::Value> {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: prompt.system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt.user,
        });

        serde_json::to_value(CompletionRequest {
            model,
            messages,
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
        })
    }

    fn extract_text(&self, body: &str) -> Option<String> {
        let response: CompletionResponse = serde_json::from_str(body).ok()?;
        response.choices.into_iter().next()?.message?.content
    }

    fn text_path(&self) -> &'static str {
        "choices[0].message.content"
    }
}
