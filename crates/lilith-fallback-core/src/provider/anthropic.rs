//! Anthropic Messages API.
//!
//! System text is folded into the single user turn rather than sent as the
//! top-level `system` field.

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::{Deserialize, Serialize};

use super::types::Prompt;
use super::WireFormat;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicMessages;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: [UserMessage<'a>; 1],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl WireFormat for AnthropicMessages {
    fn headers(&self, credential: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(credential)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(headers)
    }

    fn payload(&self, model: &str, prompt: &Prompt<'_>) -> serde_json::Result<serde_json::Value> {
        let content = prompt.combined();
        serde_json::to_value(MessagesRequest {
            model,
            messages: [UserMessage {
                role: "user",
                content: &content,
            }],
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
        })
    }

    fn extract_text(&self, body: &str) -> Option<String> {
        let response: MessagesResponse = serde_json::from_str(body).ok()?;
        response.content.into_iter().next()?.text
    }

    fn text_path(&self) -> &'static str {
        "content[0].text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_text_is_concatenated() {
        let prompt = Prompt {
            system: "Be terse",
            user: "Hi",
            max_tokens: 512,
            temperature: Some(0.7),
        };
        let body = AnthropicMessages
            .payload("claude-3-opus-20240229", &prompt)
            .unwrap();
        assert_eq!(
            body["messages"],
            json!([{"role": "user", "content": "Be terse\n\nHi"}])
        );
        assert_eq!(body["max_tokens"], 512);
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_probe_payload() {
        let body = AnthropicMessages
            .payload("claude-3-opus-20240229", &Prompt::probe())
            .unwrap();
        assert_eq!(
            body,
            json!({
                "model": "claude-3-opus-20240229",
                "messages": [{"role": "user", "content": "test"}],
                "max_tokens": 10
            })
        );
    }

    #[test]
    fn test_headers() {
        let headers = AnthropicMessages.headers("sk-ant-xxx").unwrap();
        assert_eq!(headers["x-api-key"], "sk-ant-xxx");
        assert_eq!(headers["anthropic-version"], "2023-06-01");
        assert!(headers.get("authorization").is_none());
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"content":[{"type":"text","text":"hello"}],"stop_reason":"end_turn"}"#;
        assert_eq!(AnthropicMessages.extract_text(body).as_deref(), Some("hello"));

        assert!(AnthropicMessages.extract_text(r#"{"content":[]}"#).is_none());
        // Chat-completions shape is not accepted here.
        let chat = r#"{"choices":[{"message":{"content":"4"}}]}"#;
        assert!(AnthropicMessages.extract_text(chat).is_none());
    }
}
