//! Catalog Index Builder
//!
//! Aggregates a record collection into the search/filter index written at
//! the guide tree root. The index is derived data: it is regenerated in
//! full on every export and is never the source of truth.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::codec::document;
use crate::layout;
use crate::model::Record;

/// Memo preview length in characters (not bytes).
pub const MEMO_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub meta: IndexMeta,
    pub items: Vec<IndexItem>,
}

/// Collection-level aggregates. The three distinct-value lists are sorted
/// lexicographically; the timestamp is shared by the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMeta {
    pub total_count: usize,
    pub generated_at: String,
    pub categories: Vec<String>,
    pub product_types: Vec<String>,
    pub companies: Vec<String>,
}

/// Per-record summary, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexItem {
    pub id: String,
    pub company: String,
    pub category: String,
    pub product_type: String,
    /// First [`MEMO_PREVIEW_CHARS`] characters, `...`-suffixed when cut.
    pub memo: String,
    pub updated: String,
    pub file_path: String,
}

/// Build the index for a record collection. Pure aggregation: the input is
/// not mutated and `items` follow input order.
pub fn build(records: &[Record]) -> Index {
    let mut categories = BTreeSet::new();
    let mut product_types = BTreeSet::new();
    let mut companies = BTreeSet::new();
    let mut items = Vec::with_capacity(records.len());

    for record in records {
        categories.insert(record.category.clone());
        product_types.insert(record.product_type.clone());
        companies.insert(record.company.clone());

        items.push(IndexItem {
            id: record.id.clone(),
            company: record.company.clone(),
            category: record.category.clone(),
            product_type: record.product_type.clone(),
            memo: memo_preview(&record.memo),
            updated: document::normalize_date(&record.updated_date),
            file_path: layout::path_for(record),
        });
    }

    Index {
        meta: IndexMeta {
            total_count: records.len(),
            generated_at: Utc::now().to_rfc3339(),
            categories: categories.into_iter().collect(),
            product_types: product_types.into_iter().collect(),
            companies: companies.into_iter().collect(),
        },
        items,
    }
}

fn memo_preview(memo: &str) -> String {
    if memo.chars().count() > MEMO_PREVIEW_CHARS {
        let head: String = memo.chars().take(MEMO_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        memo.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(company: &str, category: &str, product_type: &str) -> Record {
        Record {
            company: company.to_string(),
            category: category.to_string(),
            product_type: product_type.to_string(),
            ..Record::default()
        }
    }

    #[test]
    fn test_index_completeness_and_sorting() {
        let records = vec![
            record("Zeta", "Personal", "Credit"),
            record("Alpha", "Business", "Lease"),
            record("Zeta", "Personal", "Secured"),
        ];
        let index = build(&records);

        assert_eq!(index.items.len(), records.len());
        assert_eq!(index.meta.total_count, 3);
        assert_eq!(index.meta.companies, vec!["Alpha", "Zeta"]);
        assert_eq!(index.meta.categories, vec!["Business", "Personal"]);
        assert_eq!(index.meta.product_types, vec!["Credit", "Lease", "Secured"]);
        // input order preserved
        assert_eq!(index.items[0].company, "Zeta");
        assert_eq!(index.items[1].company, "Alpha");
    }

    #[test]
    fn test_item_carries_projected_path() {
        let index = build(&[record("A Bank", "Personal", "Credit (new)")]);
        assert_eq!(index.items[0].file_path, "Personal/A Bank/Credit -new.md");
    }

    #[test]
    fn test_memo_truncation_counts_characters() {
        let mut r = record("A", "B", "C");
        r.memo = "가".repeat(150);
        let index = build(&[r]);
        assert_eq!(index.items[0].memo.chars().count(), MEMO_PREVIEW_CHARS + 3);
        assert!(index.items[0].memo.ends_with("..."));

        let mut short = record("A", "B", "C");
        short.memo = "brief".to_string();
        assert_eq!(build(&[short]).items[0].memo, "brief");
    }

    #[test]
    fn test_updated_normalized_in_items() {
        let mut r = record("A", "B", "C");
        r.updated_date = "2025-02-03 09:00:00".to_string();
        assert_eq!(build(&[r]).items[0].updated, "2025-02-03");
    }

    #[test]
    fn test_index_json_keys_are_camel_case() {
        let index = build(&[record("A", "B", "C")]);
        let value = serde_json::to_value(&index).unwrap();
        assert!(value["meta"]["totalCount"].is_number());
        assert!(value["meta"]["productTypes"].is_array());
        assert!(value["items"][0]["filePath"].is_string());
    }
}
