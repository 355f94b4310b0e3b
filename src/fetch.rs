//! Guide Acquisition
//!
//! Pulls loan-product guides from the upstream catalog service by posting
//! each identifier in a fixed range to its filtering-view endpoint, and
//! maps the source key set into corpus records.
//!
//! Failures are per-identifier: a bad response is recorded and skipped,
//! never fatal to the run. There is no automatic retry; re-run the batch
//! later to fill gaps.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, COOKIE, USER_AGENT};
use serde_json::Value;

use crate::batch::CatalogError;
use crate::codec::document;
use crate::model::{Field, Record, Section};

/// Source keys grouped under the canonical section each renders into,
/// with the field label used in the guide table.
const SECTION_SOURCE_KEYS: &[(&str, &[(&str, &str)])] = &[
    (
        "Basic Info",
        &[
            ("target", "Target"),
            ("area", "Region"),
            ("age", "Age"),
            ("work_period", "Employment Period"),
            ("income", "Annual Income"),
            ("company_size", "Company Size"),
        ],
    ),
    (
        "Product Info",
        &[
            ("limit_amt", "Limit"),
            ("interest_rate", "Interest Rate"),
            ("repay_period", "Repayment Period"),
            ("repay_method", "Repayment Method"),
            ("early_repay_fee", "Early Repayment Fee"),
        ],
    ),
    (
        "Employment Type",
        &[
            ("contract_worker", "Contract"),
            ("dispatch_worker", "Dispatch"),
            ("regular_worker", "Regular"),
            ("daily_worker", "Daily"),
            ("part_time", "Part-Time"),
        ],
    ),
    (
        "Employment Verification",
        &[
            ("work_verify", "Verification Method"),
            ("company_search", "Company Search"),
            ("four_insurance", "Social Insurance"),
        ],
    ),
    (
        "Required Documents",
        &[
            ("basic_doc", "Basic Documents"),
            ("work_doc", "Employment Documents"),
            ("income_doc", "Income Documents"),
        ],
    ),
    ("Inquiry/Authentication", &[("verify_auth", "Method")]),
    ("Application Method", &[("apply_method", "Method")]),
    ("Detailed Criteria 1", &[("detail1", "Criteria")]),
    ("Detailed Criteria 2", &[("detail2", "Criteria")]),
    ("Special Notes", &[("special_note", "Notes")]),
    ("Fees", &[("fee", "Fees")]),
    ("Review Criteria", &[("review_info", "Review")]),
];

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint: String,
    /// Raw `Cookie:` header value carrying the upstream session.
    pub session_cookie: String,
    pub first_id: u32,
    pub last_id: u32,
    /// Pause between requests; the upstream service is rate-sensitive.
    pub delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            session_cookie: String::new(),
            first_id: 1,
            last_id: 200,
            delay: Duration::from_millis(500),
        }
    }
}

/// Outcome of one acquisition run.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub records: Vec<Record>,
    pub succeeded: usize,
    /// Empty pages plus failed requests.
    pub failed: usize,
    pub failures: Vec<CatalogError>,
}

/// Fetch the configured identifier range and map every hit into a record.
pub fn fetch_guides(config: &FetchConfig) -> Result<FetchReport> {
    anyhow::ensure!(!config.endpoint.is_empty(), "no endpoint configured");

    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .default_headers(default_headers(&config.session_cookie)?)
        .build()
        .context("failed to build http client")?;

    let mut report = FetchReport::default();
    for id in config.first_id..=config.last_id {
        match fetch_one(&client, &config.endpoint, id) {
            Ok(Some(record)) => {
                tracing::info!(id, company = %record.company, "fetched");
                report.records.push(record);
                report.succeeded += 1;
            }
            Ok(None) => {
                tracing::debug!(id, "empty page");
                report.failed += 1;
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "fetch failed");
                report.failed += 1;
                report.failures.push(CatalogError::Network {
                    id,
                    message: err.to_string(),
                });
            }
        }
        thread::sleep(config.delay);
    }
    Ok(report)
}

/// Map one source payload object into a corpus record. Returns `None`
/// when the payload carries nothing beyond its identifier.
pub fn map_source_item(item: &Value) -> Option<Record> {
    let mut sections = Vec::new();
    for (section_name, keys) in SECTION_SOURCE_KEYS {
        let fields: Vec<Field> = keys
            .iter()
            .map(|(source_key, label)| Field {
                name: (*label).to_string(),
                detail: str_key(item, source_key),
            })
            .filter(Field::is_emittable)
            .collect();
        if !fields.is_empty() {
            sections.push(Section {
                name: (*section_name).to_string(),
                fields,
            });
        }
    }

    let record = Record {
        id: id_key(item),
        company: first_str_key(item, &["pfi_name", "fn_name"]),
        category: str_key(item, "depth1"),
        product_type: first_str_key(item, &["depth2", "item_name"]),
        updated_date: document::normalize_date(&first_str_key(
            item,
            &["updated_dt", "update_date"],
        )),
        memo: str_key(item, "fi_memo"),
        sections,
    };

    if !record.has_company() && record.sections.is_empty() {
        return None;
    }
    Some(record)
}

fn fetch_one(client: &Client, endpoint: &str, id: u32) -> Result<Option<Record>> {
    let response = client
        .post(endpoint)
        .form(&[("item_cd", id.to_string())])
        .send()
        .with_context(|| format!("request for item {id} failed"))?;
    if !response.status().is_success() {
        anyhow::bail!("http status {}", response.status());
    }

    let payload: Value = response.json().context("response was not json")?;
    let Some(item) = payload
        .get("data")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
    else {
        return Ok(None);
    };
    Ok(map_source_item(item))
}

fn default_headers(session_cookie: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    if !session_cookie.is_empty() {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(session_cookie).context("session cookie is not a valid header")?,
        );
    }
    Ok(headers)
}

fn str_key(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("")
        .to_string()
}

fn first_str_key(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| str_key(item, key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

fn id_key(item: &Value) -> String {
    match item.get("item_cd") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_source_item_groups_sections() {
        let item = json!({
            "item_cd": 17,
            "fn_name": "ABank",
            "item_name": "Day Credit",
            "update_date": "2025-04-02 10:15:00",
            "target": "Employed adults",
            "income": "Over 20M",
            "limit_amt": "Up to 5M",
            "special_note": "None",
        });
        let record = map_source_item(&item).unwrap();
        assert_eq!(record.id, "17");
        assert_eq!(record.company, "ABank");
        assert_eq!(record.product_type, "Day Credit");
        assert_eq!(record.updated_date, "2025-04-02");

        let names: Vec<&str> = record.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Basic Info", "Product Info", "Special Notes"]);
        assert_eq!(record.sections[0].fields.len(), 2);
        assert_eq!(record.sections[0].fields[0].name, "Target");
    }

    #[test]
    fn test_map_source_item_prefers_corpus_keys() {
        let item = json!({
            "item_cd": "3",
            "pfi_name": "Primary",
            "fn_name": "Fallback",
            "depth2": "Secured",
            "item_name": "ignored",
        });
        let record = map_source_item(&item).unwrap();
        assert_eq!(record.company, "Primary");
        assert_eq!(record.product_type, "Secured");
    }

    #[test]
    fn test_map_source_item_rejects_bare_identifier() {
        assert!(map_source_item(&json!({ "item_cd": 9 })).is_none());
    }
}
