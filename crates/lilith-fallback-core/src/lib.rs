//! lilith-fallback-core: provider registry and request gateway.
//!
//! Sends a single prompt to one of five hosted LLM APIs when local hardware
//! is not enough:
//!
//! - [`provider`] — Static registry of providers and their wire formats
//! - [`credentials`] — API key snapshot taken from the environment
//! - [`config`] — Optional endpoint/model/timeout overrides from JSON
//! - [`gateway`] — Availability probing and query dispatch
//! - [`error`] — Failure taxonomy surfaced to callers
//!
//! # Quick Start
//!
//! ```no_run
//! use lilith_fallback_core::config::Config;
//! use lilith_fallback_core::credentials::Credentials;
//! use lilith_fallback_core::gateway::Gateway;
//! use lilith_fallback_core::provider::types::QueryRequest;
//! use lilith_fallback_core::provider::ProviderId;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let gateway = Gateway::new(Config::load()?, Credentials::from_env());
//!
//! gateway.ensure_available(ProviderId::Groq).await?;
//! let request = QueryRequest::new(ProviderId::Groq, "Explain cgroups in one line")
//!     .with_system_prompt("Be terse");
//! let text = gateway.query(&request).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod provider;
