//! Error taxonomy for the provider gateway.
//!
//! A missing credential has no variant: it only ever shows up as
//! [`crate::gateway::ProbeOutcome::CredentialMissing`] and the provider
//! dropping out of the availability list.

use thiserror::Error;

use crate::provider::ProviderId;

/// Failures surfaced to callers of [`crate::gateway::Gateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested id is not in the registry.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The provider did not pass its availability probe.
    #[error("{provider} API not available. Available: [{}]", join_ids(.available))]
    ProviderUnavailable {
        provider: ProviderId,
        available: Vec<ProviderId>,
    },

    /// Transport failure or non-2xx status.
    #[error("API Error for {provider}: {cause}")]
    ProviderQueryFailed { provider: ProviderId, cause: String },

    /// 2xx response that does not carry text at the expected path.
    #[error("API Error for {provider}: response has no `{path}`")]
    MalformedResponse {
        provider: ProviderId,
        path: &'static str,
    },
}

impl GatewayError {
    pub(crate) fn query_failed(provider: ProviderId, cause: impl ToString) -> Self {
        GatewayError::ProviderQueryFailed {
            provider,
            cause: cause.to_string(),
        }
    }
}

fn join_ids(ids: &[ProviderId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
