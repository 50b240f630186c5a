//! Request types shared by the gateway and the wire formats.

use std::borrow::Cow;

use super::{ProviderId, TEMPERATURE};

/// Token-budget hint used when the caller gives none.
pub const DEFAULT_TOKEN_BUDGET_HINT: u32 = 2048;

/// One prompt to send to one provider.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub provider: ProviderId,
    pub prompt: String,
    /// Preamble text; empty means none.
    pub system_prompt: String,
    /// Loose proxy for desired response length, scaled into `max_tokens`.
    pub token_budget_hint: u32,
}

impl QueryRequest {
    pub fn new(provider: ProviderId, prompt: impl Into<String>) -> Self {
        Self {
            provider,
            prompt: prompt.into(),
            system_prompt: String::new(),
            token_budget_hint: DEFAULT_TOKEN_BUDGET_HINT,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_token_budget_hint(mut self, hint: u32) -> Self {
        self.token_budget_hint = hint;
        self
    }

    /// The prompt as it goes on the wire for this request's provider.
    pub fn to_prompt(&self) -> Prompt<'_> {
        Prompt {
            system: &self.system_prompt,
            user: &self.prompt,
            max_tokens: self
                .provider
                .descriptor()
                .max_output_tokens(self.token_budget_hint),
            temperature: Some(TEMPERATURE),
        }
    }
}

/// Wire-level view of a prompt, borrowed from a [`QueryRequest`] or built
/// for an availability probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub max_tokens: u32,
    /// `None` leaves the field out of the payload entirely.
    pub temperature: Option<f32>,
}

impl Prompt<'static> {
    /// Minimal request used to check that a key works.
    pub fn probe() -> Self {
        Prompt {
            system: "",
            user: "test",
            max_tokens: 10,
            temperature: None,
        }
    }
}

impl<'a> Prompt<'a> {
    /// System text, a blank line, then the prompt. Used by APIs that take a
    /// single user turn.
    pub fn combined(&self) -> Cow<'a, str> {
        if self.system.is_empty() {
            Cow::Borrowed(self.user)
        } else {
            Cow::Owned(format!("{}\n\n{}", self.system, self.user))
        }
    }
}
