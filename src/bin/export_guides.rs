//! Export the JSON corpus into the editable guide tree.
//!
//! Reads the corpus file, writes one markdown document per product, and
//! regenerates `_index.json` at the tree root.
//! Run with: cargo run --bin export_guides [corpus.json] [output_dir]

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use loan_guide_catalog::batch;
use loan_guide_catalog::model::Record;

const DEFAULT_INPUT: &str = "loan_guides.json";
const DEFAULT_OUTPUT_DIR: &str = "guides";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_INPUT.to_string()));
    let output = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()));

    println!("{}", "=".repeat(60));
    println!("Exporting guide documents");
    println!("{}", "=".repeat(60));

    let contents = fs::read_to_string(&input)
        .with_context(|| format!("failed to read corpus {}", input.display()))?;
    let records: Vec<Record> = serde_json::from_str(&contents)
        .with_context(|| format!("corpus {} is not valid JSON", input.display()))?;
    println!("Loaded {} records", records.len());

    batch::reset_guide_tree(&output)?;
    let report = batch::export_tree(&records, &output)?;

    println!();
    println!("{}", "=".repeat(60));
    println!("Export complete");
    println!("{}", "=".repeat(60));
    println!("Written: {}", report.written);
    println!("Skipped: {}", report.skipped.len());
    println!("Errors:  {}", report.errors.len());
    println!("Index:   {}", report.index_path.display());

    if !report.errors.is_empty() {
        println!("\nError list:");
        for line in batch::error_preview(&report.errors) {
            println!("  - {line}");
        }
    }
    Ok(())
}
