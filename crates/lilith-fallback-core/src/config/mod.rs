//! Configuration for lilith-fallback.
//!
//! Loads typed configuration from `~/.lilith-fallback/config.json`.
//! Everything is optional: an absent file means registry endpoints, registry
//! models and the stock 10s/60s timeouts. API keys are not configurable here.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::ProviderId;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub timeouts: TimeoutConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a specific path. The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .timeouts
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lilith-fallback")
            .join("config.json")
    }
}

// ── Provider Overrides ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderOverride {
    /// Replaces the registry endpoint. May contain `{model}`.
    pub endpoint: Option<String>,
    /// Replaces the registry model identifier.
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub openai: Option<ProviderOverride>,
    pub anthropic: Option<ProviderOverride>,
    pub groq: Option<ProviderOverride>,
    pub mistral: Option<ProviderOverride>,
    pub gemini: Option<ProviderOverride>,
}

impl ProvidersConfig {
    pub fn get(&self, provider: ProviderId) -> Option<&ProviderOverride> {
        match provider {
            ProviderId::OpenAi => self.openai.as_ref(),
            ProviderId::Anthropic => self.anthropic.as_ref(),
            ProviderId::Groq => self.groq.as_ref(),
            ProviderId::Mistral => self.mistral.as_ref(),
            ProviderId::Gemini => self.gemini.as_ref(),
        }
    }

    pub fn set(&mut self, provider: ProviderId, entry: ProviderOverride) {
        let slot = match provider {
            ProviderId::OpenAi => &mut self.openai,
            ProviderId::Anthropic => &mut self.anthropic,
            ProviderId::Groq => &mut self.groq,
            ProviderId::Mistral => &mut self.mistral,
            ProviderId::Gemini => &mut self.gemini,
        };
        *slot = Some(entry);
    }

    /// Effective endpoint template for `provider`.
    pub fn endpoint(&self, provider: ProviderId) -> &str {
        self.get(provider)
            .and_then(|o| o.endpoint.as_deref())
            .unwrap_or(provider.descriptor().endpoint)
    }

    /// Effective model identifier for `provider`.
    pub fn model(&self, provider: ProviderId) -> &str {
        self.get(provider)
            .and_then(|o| o.model.as_deref())
            .unwrap_or(provider.descriptor().model)
    }
}

// ── Timeouts ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeoutConfig {
    pub probe_secs: u64,
    pub query_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_secs: 10,
            query_secs: 60,
        }
    }
}

impl TimeoutConfig {
    /// Both timeouts must be non-zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.probe_secs == 0 {
            anyhow::bail!("timeouts.probeSecs must be greater than 0");
        }
        if self.query_secs == 0 {
            anyhow::bail!("timeouts.querySecs must be greater than 0");
        }
        Ok(())
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }

    pub fn query(&self) -> Duration {
        Duration::from_secs(self.query_secs)
    }
}
