//! API key lookup.
//!
//! Keys only ever come from the environment. They are read once into a
//! [`Credentials`] snapshot that the gateway holds for the rest of the run.

use std::collections::HashMap;
use std::fmt;

use crate::provider::ProviderId;

#[derive(Clone, Default)]
pub struct Credentials {
    keys: HashMap<ProviderId, String>,
}

impl Credentials {
    /// Read every provider's key from its environment variable.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (e.g. a fixed map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let keys = ProviderId::ALL
            .into_iter()
            .filter_map(|id| lookup(id.descriptor().credential_env).map(|key| (id, key)))
            .collect();
        Self { keys }
    }

    pub fn with(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.keys.insert(provider, key.into());
        self
    }

    /// The key for `provider`. Unset and empty are both `None`.
    pub fn get(&self, provider: ProviderId) -> Option<&str> {
        self.keys
            .get(&provider)
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let configured: Vec<_> = ProviderId::ALL
            .into_iter()
            .filter(|id| self.get(*id).is_some())
            .collect();
        f.debug_struct("Credentials")
            .field("configured", &configured)
            .finish()
    }
}
