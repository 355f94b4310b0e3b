//! Import the guide tree back into the JSON corpus.
//!
//! Decodes every (possibly hand-edited) markdown document under the input
//! directory and writes the resulting records as one corpus file.
//! Run with: cargo run --bin import_guides [input_dir] [corpus.json]

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use loan_guide_catalog::batch;

const DEFAULT_INPUT_DIR: &str = "guides";
const DEFAULT_OUTPUT: &str = "loan_guides_updated.json";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_INPUT_DIR.to_string()));
    let output = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string()));

    println!("{}", "=".repeat(60));
    println!("Importing guide documents");
    println!("{}", "=".repeat(60));

    let report = batch::import_tree(&input)?;
    println!("Found {} guide documents", report.scanned);

    let json = serde_json::to_string_pretty(&report.records)
        .context("failed to serialize corpus")?;
    fs::write(&output, json)
        .with_context(|| format!("failed to write corpus {}", output.display()))?;

    println!();
    println!("{}", "=".repeat(60));
    println!("Import complete");
    println!("{}", "=".repeat(60));
    println!("Imported:   {}", report.records.len());
    println!("Skipped:    {}", report.skipped.len());
    println!("Errors:     {}", report.errors.len());
    println!("Advisories: {}", report.advisories.len());
    println!("Corpus:     {}", output.display());

    if !report.errors.is_empty() {
        println!("\nError list:");
        for line in batch::error_preview(&report.errors) {
            println!("  - {line}");
        }
    }
    if !report.advisories.is_empty() {
        println!("\nAdvisories:");
        for line in batch::error_preview(&report.advisories) {
            println!("  - {line}");
        }
    }
    Ok(())
}
