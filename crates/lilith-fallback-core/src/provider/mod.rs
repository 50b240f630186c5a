//! Provider registry.
//!
//! Every supported backend is described by a [`ProviderDescriptor`] in the
//! static [`REGISTRY`]. Per-provider differences (auth headers, query
//! parameters, payload shape, where the answer lives in the response) sit
//! behind the [`WireFormat`] trait, with one implementation per API family:
//!
//! - [`chat::ChatCompletions`] — OpenAI, Groq, Mistral
//! - [`anthropic::AnthropicMessages`] — Anthropic
//! - [`gemini::GeminiGenerateContent`] — Google Gemini

pub mod anthropic;
pub mod chat;
pub mod gemini;
pub mod types;

use std::fmt;
use std::str::FromStr;

use reqwest::header::{HeaderMap, InvalidHeaderValue};
use reqwest::Url;

use crate::error::GatewayError;
use types::Prompt;

/// Response-length ceiling shared by every registered provider.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Lower bound for the response cap derived from a token-budget hint.
pub const MIN_RESPONSE_TOKENS: u32 = 512;

/// Sampling temperature used for real queries. Probes send none.
pub const TEMPERATURE: f32 = 0.7;

/// Closed set of supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Groq,
    Mistral,
    Gemini,
}

impl ProviderId {
    /// All providers in registry order.
    pub const ALL: [ProviderId; 5] = [
        ProviderId::OpenAi,
        ProviderId::Anthropic,
        ProviderId::Groq,
        ProviderId::Mistral,
        ProviderId::Gemini,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Groq => "groq",
            ProviderId::Mistral => "mistral",
            ProviderId::Gemini => "gemini",
        }
    }

    pub fn descriptor(self) -> &'static ProviderDescriptor {
        &REGISTRY[self as usize]
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| GatewayError::UnknownProvider(s.to_string()))
    }
}

/// The per-provider strategy: how to authenticate, what to send and where
/// the generated text is found in the reply.
pub trait WireFormat: Sync {
    /// Request headers carrying the credential (if the API uses headers).
    fn headers(&self, credential: &str) -> Result<HeaderMap, InvalidHeaderValue>;

    /// Extra URL query parameters. Empty for header-authenticated APIs.
    fn query_params<'a>(&self, _credential: &'a str) -> Vec<(&'static str, &'a str)> {
        Vec::new()
    }

    /// JSON request body.
    fn payload(&self, model: &str, prompt: &Prompt<'_>) -> serde_json::Result<serde_json::Value>;

    /// Pull the generated text out of a 2xx response body.
    fn extract_text(&self, body: &str) -> Option<String>;

    /// Human-readable location of the text, used in error messages.
    fn text_path(&self) -> &'static str;
}

/// Immutable description of one provider.
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub display_name: &'static str,
    /// Endpoint template; `{model}` is substituted at request time.
    pub endpoint: &'static str,
    pub model: &'static str,
    /// Environment variable holding the API key.
    pub credential_env: &'static str,
    pub max_tokens: u32,
    pub wire: &'static dyn WireFormat,
}

impl ProviderDescriptor {
    /// `min(max_tokens, max(512, hint * 4))`.
    pub fn max_output_tokens(&self, token_budget_hint: u32) -> u32 {
        self.max_tokens
            .min(token_budget_hint.saturating_mul(4).max(MIN_RESPONSE_TOKENS))
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("credential_env", &self.credential_env)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

/// Indexed by `ProviderId as usize`.
pub static REGISTRY: [ProviderDescriptor; 5] = [
    ProviderDescriptor {
        id: ProviderId::OpenAi,
        display_name: "OpenAI",
        endpoint: "https://api.openai.com/v1/chat/completions",
        model: "gpt-4-turbo-preview",
        credential_env: "OPENAI_API_KEY",
        max_tokens: DEFAULT_MAX_TOKENS,
        wire: &chat::ChatCompletions,
    },
    ProviderDescriptor {
        id: ProviderId::Anthropic,
        display_name: "Anthropic",
        endpoint: "https://api.anthropic.com/v1/messages",
        model: "claude-3-opus-20240229",
        credential_env: "ANTHROPIC_API_KEY",
        max_tokens: DEFAULT_MAX_TOKENS,
        wire: &anthropic::AnthropicMessages,
    },
    ProviderDescriptor {
        id: ProviderId::Groq,
        display_name: "Groq",
        endpoint: "https://api.groq.com/openai/v1/chat/completions",
        model: "mixtral-8x7b-32768",
        credential_env: "GROQ_API_KEY",
        max_tokens: DEFAULT_MAX_TOKENS,
        wire: &chat::ChatCompletions,
    },
    ProviderDescriptor {
        id: ProviderId::Mistral,
        display_name: "Mistral",
        endpoint: "https://api.mistral.ai/v1/chat/completions",
        model: "mistral-large-latest",
        credential_env: "MISTRAL_API_KEY",
        max_tokens: DEFAULT_MAX_TOKENS,
        wire: &chat::ChatCompletions,
    },
    // Google issues the key, hence GOOGLE_API_KEY rather than GEMINI_API_KEY.
    ProviderDescriptor {
        id: ProviderId::Gemini,
        display_name: "Google Gemini",
        endpoint: "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent",
        model: "gemini-pro",
        credential_env: "GOOGLE_API_KEY",
        max_tokens: DEFAULT_MAX_TOKENS,
        wire: &gemini::GeminiGenerateContent,
    },
];

/// Build a fresh request URL from an endpoint template.
///
/// Pure: nothing is written back to the descriptor, so a key appended for
/// one request never shows up in the next.
pub fn build_url(template: &str, model: &str, params: &[(&str, &str)]) -> Result<Url, String> {
    let mut url = Url::parse(&template.replace("{model}", model))
        .map_err(|e| format!("invalid endpoint '{}': {}", template, e))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_matches_ids() {
        for id in ProviderId::ALL {
            assert_eq!(id.descriptor().id, id);
        }
    }

    #[test]
    fn test_credential_env_naming() {
        for id in ProviderId::ALL {
            let expected = match id {
                ProviderId::Gemini => "GOOGLE_API_KEY".to_string(),
                other => format!("{}_API_KEY", other.as_str().to_uppercase()),
            };
            assert_eq!(id.descriptor().credential_env, expected);
        }
    }

    #[test]
    fn test_parse_provider_ids() {
        assert_eq!("openai".parse::<ProviderId>().unwrap(), ProviderId::OpenAi);
        assert_eq!("gemini".parse::<ProviderId>().unwrap(), ProviderId::Gemini);

        let err = "cohere".parse::<ProviderId>().unwrap_err();
        assert!(matches!(err, GatewayError::UnknownProvider(ref id) if id == "cohere"));
        assert!("OpenAI".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_max_output_tokens_clamp() {
        let d = ProviderId::OpenAi.descriptor();
        assert_eq!(d.max_output_tokens(2048), 4096);
        assert_eq!(d.max_output_tokens(0), 512);
        assert_eq!(d.max_output_tokens(100_000), 4096);
        assert_eq!(d.max_output_tokens(200), 800);
        assert_eq!(d.max_output_tokens(u32::MAX), 4096);
    }

    #[test]
    fn test_build_url_substitutes_model_and_appends_key() {
        let d = ProviderId::Gemini.descriptor();
        let url = build_url(d.endpoint, d.model, &[("key", "abc 123")]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent?key=abc+123"
        );

        // Built twice from the same template: the key is never doubled.
        let again = build_url(d.endpoint, d.model, &[("key", "abc")]).unwrap();
        assert_eq!(again.query(), Some("key=abc"));
        assert!(!d.endpoint.contains('?'));
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        assert!(build_url("not a url", "m", &[]).is_err());
    }
}
