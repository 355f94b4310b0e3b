//! Fetch loan-product guides from the upstream catalog service.
//!
//! Walks the identifier range, maps every hit into a corpus record, and
//! writes the corpus JSON. The session cookie and endpoint come from the
//! environment so no credentials live in the repository.
//! Run with: cargo run --features fetch --bin fetch_guides [corpus.json] [last_id]

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use loan_guide_catalog::fetch::{fetch_guides, FetchConfig};

const DEFAULT_OUTPUT: &str = "loan_guides.json";
const ENDPOINT_VAR: &str = "GUIDE_ENDPOINT";
const COOKIE_VAR: &str = "GUIDE_SESSION_COOKIE";

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string()));
    let last_id: u32 = match args.next() {
        Some(raw) => raw.parse().context("last_id must be a number")?,
        None => FetchConfig::default().last_id,
    };

    let config = FetchConfig {
        endpoint: env::var(ENDPOINT_VAR)
            .with_context(|| format!("{ENDPOINT_VAR} is not set"))?,
        session_cookie: env::var(COOKIE_VAR).unwrap_or_default(),
        last_id,
        ..FetchConfig::default()
    };

    println!("{}", "=".repeat(60));
    println!("Fetching guides {}..={}", config.first_id, config.last_id);
    println!("{}", "=".repeat(60));

    let report = fetch_guides(&config)?;

    let json = serde_json::to_string_pretty(&report.records)
        .context("failed to serialize corpus")?;
    fs::write(&output, json)
        .with_context(|| format!("failed to write corpus {}", output.display()))?;

    println!();
    println!("{}", "=".repeat(60));
    println!("Fetch complete");
    println!("{}", "=".repeat(60));
    println!("Succeeded: {}", report.succeeded);
    println!("Failed:    {}", report.failed);
    println!("Corpus:    {}", output.display());
    Ok(())
}
