//! Google Gemini `generateContent`.
//!
//! The key travels as a `key=` query parameter, never as a header, and the
//! model is part of the URL path rather than the body.

use reqwest::header::{HeaderMap, InvalidHeaderValue};
use serde::{Deserialize, Serialize};

use super::types::Prompt;
use super::WireFormat;

pub struct GeminiGenerateContent;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl WireFormat for GeminiGenerateContent {
    fn headers(&self, _credential: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        Ok(HeaderMap::new())
    }

    fn query_params<'a>(&self, credential: &'a str) -> Vec<(&'static str, &'a str)> {
        vec![("key", credential)]
    }

    fn payload(&self, _model: &str, prompt: &Prompt<'_>) -> serde_json::Result<serde_json::Value> {
        let text = prompt.combined();
        serde_json::to_value(GenerateRequest {
            contents: [Content {
                parts: [Part { text: &text }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: prompt.max_tokens,
                temperature: prompt.temperature,
            },
        })
    }

    fn extract_text(&self, body: &str) -> Option<String> {
        let response: GenerateResponse = serde_json::from_str(body).ok()?;
        response
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }

    fn text_path(&self) -> &'static str {
        "candidates[0].content.parts[0].text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let prompt = Prompt {
            system: "Be terse",
            user: "Hi",
            max_tokens: 4096,
            temperature: Some(0.5),
        };
        let body = GeminiGenerateContent.payload("gemini-pro", &prompt).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"parts": [{"text": "Be terse\n\nHi"}]}],
                "generationConfig": {"maxOutputTokens": 4096, "temperature": 0.5}
            })
        );
    }

    #[test]
    fn test_probe_payload() {
        let body = GeminiGenerateContent
            .payload("gemini-pro", &Prompt::probe())
            .unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"parts": [{"text": "test"}]}],
                "generationConfig": {"maxOutputTokens": 10}
            })
        );
    }

    #[test]
    fn test_key_goes_in_query_not_headers() {
        assert!(GeminiGenerateContent.headers("g-key").unwrap().is_empty());
        assert_eq!(GeminiGenerateContent.query_params("g-key"), vec![("key", "g-key")]);
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"bonjour"}],"role":"model"}}]}"#;
        assert_eq!(
            GeminiGenerateContent.extract_text(body).as_deref(),
            Some("bonjour")
        );

        assert!(GeminiGenerateContent.extract_text(r#"{"candidates":[]}"#).is_none());
        assert!(GeminiGenerateContent
            .extract_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
            .is_none());
    }
}
