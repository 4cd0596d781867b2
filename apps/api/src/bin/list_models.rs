//! Offline diagnostic: lists the completion models a credential can use.
//!
//! Shares nothing with the server process; it takes its own credential and exits.

use anyhow::{bail, Context, Result};
use clap::Parser;
use reqwest::Client;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "list-models", about = "List completion models available to an API key")]
struct Cli {
    /// Inference provider API key.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Provider base URL.
    #[arg(long, env = "GROQ_BASE_URL", default_value = "https://api.groq.com")]
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    owned_by: Option<String>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(api_key) = cli.api_key.filter(|k| !k.trim().is_empty()) else {
        bail!("no API key: pass --api-key or set GROQ_API_KEY");
    };

    println!("Checking available models for your API key...");

    let models = fetch_models(&cli.base_url, &api_key).await?;
    let active: Vec<&ModelEntry> = models.iter().filter(|m| m.active).collect();

    if active.is_empty() {
        println!("No completion models found. Check that the key is valid and has API access.");
        return Ok(());
    }

    for model in active {
        match &model.owned_by {
            Some(owner) => println!("Found model: {} ({owner})", model.id),
            None => println!("Found model: {}", model.id),
        }
    }

    Ok(())
}

async fn fetch_models(base_url: &str, api_key: &str) -> Result<Vec<ModelEntry>> {
    let url = format!("{}/openai/v1/models", base_url.trim_end_matches('/'));

    let response = Client::new()
        .get(&url)
        .bearer_auth(api_key)
        .send()
        .await
        .with_context(|| format!("failed to reach {url}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("model listing failed ({status}): {body}");
    }

    let list: ModelList = response
        .json()
        .await
        .context("unexpected model list response")?;
    Ok(list.data)
}
