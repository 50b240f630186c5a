//! Provider gateway: availability probing and query dispatch.
//!
//! Each call is one POST with its own timeout. Nothing is retried and no
//! state survives between calls apart from the read-only registry, the
//! configuration and the credential snapshot.

use futures::future::join_all;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::GatewayError;
use crate::provider::types::{Prompt, QueryRequest};
use crate::provider::{build_url, ProviderId};

/// Result of probing one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Available,
    /// Key unset or empty; no request was sent.
    CredentialMissing,
    /// The provider answered with something other than 200/201.
    Rejected(u16),
    /// Timeout, DNS, TLS or connection failure.
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeOutcome::Available)
    }
}

pub struct Gateway {
    client: Client,
    config: Config,
    credentials: Credentials,
}

impl Gateway {
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self::with_client(Client::new(), config, credentials)
    }

    pub fn with_client(client: Client, config: Config, credentials: Credentials) -> Self {
        debug!(?credentials, "Initialized provider gateway");
        Self {
            client,
            config,
            credentials,
        }
    }

    /// Send a minimal request to check that `provider`'s key works.
    ///
    /// Never fails: every problem maps to a non-available outcome.
    pub async fn probe(&self, provider: ProviderId) -> ProbeOutcome {
        let Some(credential) = self.credentials.get(provider) else {
            debug!(provider = %provider, env = provider.descriptor().credential_env, "No credential, skipping probe");
            return ProbeOutcome::CredentialMissing;
        };

        let outcome = match self
            .send(provider, credential, &Prompt::probe(), self.config.timeouts.probe())
            .await
        {
            Ok(response) => match response.status().as_u16() {
                200 | 201 => ProbeOutcome::Available,
                status => ProbeOutcome::Rejected(status),
            },
            Err(e) => ProbeOutcome::Unreachable(e.to_string()),
        };

        match &outcome {
            ProbeOutcome::Available => debug!(provider = %provider, "Probe succeeded"),
            other => warn!(provider = %provider, outcome = ?other, "Probe failed, provider unavailable"),
        }
        outcome
    }

    /// Providers whose probe succeeds, in registry order.
    pub async fn list_available(&self) -> Vec<ProviderId> {
        let outcomes = join_all(
            ProviderId::ALL
                .into_iter()
                .map(|id| async move { (id, self.probe(id).await) }),
        )
        .await;

        outcomes
            .into_iter()
            .filter(|(_, outcome)| outcome.is_available())
            .map(|(id, _)| id)
            .collect()
    }

    /// Fail with [`GatewayError::ProviderUnavailable`] unless `provider`
    /// passes its probe right now.
    pub async fn ensure_available(&self, provider: ProviderId) -> Result<(), GatewayError> {
        let available = self.list_available().await;
        if available.contains(&provider) {
            Ok(())
        } else {
            Err(GatewayError::ProviderUnavailable {
                provider,
                available,
            })
        }
    }

    /// [`Gateway::query`] keyed by provider name.
    pub async fn query_named(
        &self,
        provider: &str,
        prompt: &str,
        system_prompt: &str,
        token_budget_hint: u32,
    ) -> Result<String, GatewayError> {
        let provider: ProviderId = provider.parse()?;
        let request = QueryRequest::new(provider, prompt)
            .with_system_prompt(system_prompt)
            .with_token_budget_hint(token_budget_hint);
        self.query(&request).await
    }

    /// Send `request` and return the generated text.
    pub async fn query(&self, request: &QueryRequest) -> Result<String, GatewayError> {
        let provider = request.provider;
        let descriptor = provider.descriptor();
        let credential = self.credentials.get(provider).ok_or_else(|| {
            GatewayError::query_failed(provider, format!("{} is not set", descriptor.credential_env))
        })?;

        let response = self
            .send(provider, credential, &request.to_prompt(), self.config.timeouts.query())
            .await?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GatewayError::query_failed(
                provider,
                format!("failed to read response body: {}", e.without_url()),
            )
        })?;

        if !status.is_success() {
            return Err(GatewayError::query_failed(
                provider,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let text = descriptor
            .wire
            .extract_text(&body)
            .ok_or(GatewayError::MalformedResponse {
                provider,
                path: descriptor.wire.text_path(),
            })?;

        debug!(provider = %provider, bytes = text.len(), "Received response");
        Ok(text)
    }

    async fn send(
        &self,
        provider: ProviderId,
        credential: &str,
        prompt: &Prompt<'_>,
        timeout: Duration,
    ) -> Result<Response, GatewayError> {
        let descriptor = provider.descriptor();
        let wire = descriptor.wire;
        let model = self.config.providers.model(provider);

        let url = build_url(
            self.config.providers.endpoint(provider),
            model,
            &wire.query_params(credential),
        )
        .map_err(|e| GatewayError::query_failed(provider, e))?;
        let headers = wire.headers(credential).map_err(|_| {
            GatewayError::query_failed(
                provider,
                format!("{} is not a valid header value", descriptor.credential_env),
            )
        })?;
        let body = wire
            .payload(model, prompt)
            .map_err(|e| GatewayError::query_failed(provider, e))?;

        debug!(
            provider = descriptor.display_name,
            model,
            max_tokens = prompt.max_tokens,
            timeout_secs = timeout.as_secs(),
            "Sending request"
        );

        // without_url: Gemini carries the key in the query string.
        self.client
            .post(url)
            .headers(headers)
            .json(&body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| GatewayError::query_failed(provider, e.without_url()))
    }
}
