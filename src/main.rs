//! Thin CLI entry point (out of core scope per spec §1; ambient per
//! SPEC_FULL.md §1.2/§1.4): parses arguments, installs a `tracing`
//! subscriber, loads `.env` via `dotenvy`, and drives one `browse_web` run.

use clap::Parser;
use secrecy::{ExposeSecret, SecretString};

use outline_agent::agent::RigModel;
use outline_agent::{browse_web, BrowseConfig};

#[derive(Debug, Parser)]
#[command(name = "outline-agent", about = "LLM-driven web browsing over a compact, reference-tagged accessibility outline.")]
struct Cli {
    /// Starting URL.
    url: String,

    /// Natural-language task for the model to accomplish.
    task: String,

    /// Model API key. Falls back to `OUTLINE_AGENT_MODEL_API_KEY`.
    #[arg(long, env = "OUTLINE_AGENT_MODEL_API_KEY")]
    api_key: Option<SecretString>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let cfg = BrowseConfig::resolve()?;

    let api_key = cli
        .api_key
        .ok_or_else(|| anyhow::anyhow!("no model API key: pass --api-key or set OUTLINE_AGENT_MODEL_API_KEY"))?;

    let client = rig::providers::openai::Client::new(api_key.expose_secret());
    let completion_model = client.completion_model(rig::providers::openai::GPT_4O);
    let model = RigModel::new(completion_model);

    let output = browse_web(&model, &cfg, &cli.url, &cli.task).await?;

    println!("{}", output.result);
    tracing::info!(
        model_calls = output.usage.model_calls,
        input_tokens = output.usage.input_tokens,
        output_tokens = output.usage.output_tokens,
        steps = output.steps.len(),
        "browse_web finished"
    );

    Ok(())
}
