//! lilith-fallback CLI — send one prompt to a cloud LLM and save the answer.
//!
//! Usage:
//!   lilith-fallback --list
//!   lilith-fallback --provider groq --prompt "..." --output answer.txt
//!
//! API keys are read from OPENAI_API_KEY, ANTHROPIC_API_KEY, GROQ_API_KEY,
//! MISTRAL_API_KEY and GOOGLE_API_KEY.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use lilith_fallback_core::config::Config;
use lilith_fallback_core::credentials::Credentials;
use lilith_fallback_core::gateway::Gateway;
use lilith_fallback_core::provider::types::{QueryRequest, DEFAULT_TOKEN_BUDGET_HINT};
use lilith_fallback_core::provider::ProviderId;

#[derive(Parser)]
#[command(
    name = "lilith-fallback",
    version,
    about = "Lilith Linux API fallback: send a prompt to a cloud LLM",
    long_about = "Forwards one prompt to OpenAI, Anthropic, Groq, Mistral or Gemini when local\nhardware is not enough, and writes the raw answer to a file."
)]
struct Cli {
    /// List providers whose API keys work, one per line
    #[arg(long)]
    list: bool,

    /// Provider to query: openai, anthropic, groq, mistral or gemini
    #[arg(long)]
    provider: Option<String>,

    /// Prompt text
    #[arg(long)]
    prompt: Option<String>,

    /// Preamble placed before the prompt
    #[arg(long, default_value = "")]
    system_prompt: String,

    /// Token-budget hint; the response cap is max(512, 4 * this), at most 4096
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_TOKEN_BUDGET_HINT as i64)]
    context_mb: i64,

    /// File that receives the response text
    #[arg(long)]
    output: Option<PathBuf>,

    /// Config file (default: ~/.lilith-fallback/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the --list output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    // Flags are checked before the config file is touched.
    let query = if cli.list {
        None
    } else {
        Some(QueryArgs::from_cli(&cli)?)
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    debug!(config = ?cli.config, "Loaded configuration");
    let gateway = Gateway::new(config, Credentials::from_env());

    match query {
        None => cmd_list(&gateway).await,
        Some(args) => cmd_query(&gateway, args).await,
    }
}

/// Validated arguments for a single query.
struct QueryArgs {
    request: QueryRequest,
    output: PathBuf,
}

impl QueryArgs {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());
        let (Some(provider), Some(prompt), Some(output)) = (
            non_empty(&cli.provider),
            non_empty(&cli.prompt),
            cli.output.clone(),
        ) else {
            anyhow::bail!("--provider, --prompt, and --output are required");
        };

        let provider: ProviderId = provider.parse()?;
        // Negative hints fall to the 512-token floor; huge ones to the ceiling.
        let hint = cli.context_mb.clamp(0, u32::MAX as i64) as u32;
        let request = QueryRequest::new(provider, prompt)
            .with_system_prompt(cli.system_prompt.clone())
            .with_token_budget_hint(hint);

        Ok(Self { request, output })
    }
}

// ── List Command ────────────────────────────────────────────────────

async fn cmd_list(gateway: &Gateway) -> Result<()> {
    let available: Vec<&str> = gateway
        .list_available()
        .await
        .into_iter()
        .map(ProviderId::as_str)
        .collect();
    println!("{}", available.join("\n"));
    Ok(())
}

// ── Query Command ───────────────────────────────────────────────────

async fn cmd_query(gateway: &Gateway, args: QueryArgs) -> Result<()> {
    let QueryArgs { request, output } = args;
    let provider = request.provider;

    gateway.ensure_available(provider).await?;
    let text = gateway.query(&request).await?;

    // Only reached with a fully extracted answer.
    std::fs::write(&output, &text)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    debug!(provider = %provider, bytes = text.len(), "Saved response");
    println!("API query completed - saved to {}", output.display());

    Ok(())
}
