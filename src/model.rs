//! Corpus Data Model
//!
//! Records, sections, and fields for loan-product guides, as exchanged on
//! the JSON boundary (camelCase keys). Empty strings are the "absent"
//! sentinel everywhere; no field is optional at the type level.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::codec::cell;

/// Rendering order for known section names. Unknown names sort after all
/// of these, in the order they were first encountered.
pub const SECTION_ORDER: &[&str] = &[
    "Basic Info",
    "Product Info",
    "Employment Type",
    "Employment Verification",
    "Required Documents",
    "Inquiry/Authentication",
    "Application Method",
    "Detailed Criteria 1",
    "Detailed Criteria 2",
    "Income",
    "Industry",
    "Vehicle Info",
    "Property Conditions",
    "Special Notes",
    "Fees",
    "Review Criteria",
    "Lender Tips",
    "Encyclopedia",
    "Policy Limits",
];

/// One loan-product guide in normalized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    /// Stable catalog identifier; may be empty.
    pub id: String,
    /// Lender name. A record without one is unusable and gets skipped by
    /// the batch drivers.
    pub company: String,
    pub category: String,
    pub product_type: String,
    /// `YYYY-MM-DD` or free text or empty.
    pub updated_date: String,
    /// Multi-line free text rendered as a blockquote.
    pub memo: String,
    /// Insertion order is the encounter order; rendering order is
    /// canonical (see [`canonical_sections`]).
    pub sections: Vec<Section>,
}

impl Record {
    pub fn has_company(&self) -> bool {
        !self.company.trim().is_empty()
    }
}

/// Named group of fields, rendered as one table under a level-2 heading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Section {
    /// A section is rendered only when at least one field survives the
    /// emittability rule.
    pub fn is_emittable(&self) -> bool {
        self.fields.iter().any(Field::is_emittable)
    }
}

/// A name/detail pair rendered as one table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub name: String,
    /// Multi-line; line order is meaningful.
    pub detail: String,
}

impl Field {
    /// Rendered only when the name survives trimming and the detail still
    /// has content once blank lines are dropped.
    pub fn is_emittable(&self) -> bool {
        !self.name.trim().is_empty() && !cell::encode(&self.detail).is_empty()
    }
}

/// Collapse duplicate section names: a later section's fields replace the
/// earlier occurrence, which keeps its original position.
pub fn dedup_sections(sections: Vec<Section>) -> Vec<Section> {
    let mut by_name: FxHashMap<String, usize> = FxHashMap::default();
    let mut out: Vec<Section> = Vec::new();
    for section in sections {
        match by_name.get(section.name.as_str()) {
            Some(&slot) => out[slot] = section,
            None => {
                by_name.insert(section.name.clone(), out.len());
                out.push(section);
            }
        }
    }
    out
}

/// Sections in rendering order: duplicates collapsed, known names by their
/// [`SECTION_ORDER`] rank, unknown names after them in encounter order.
/// The sort is stable, so one pass covers both cases.
pub fn canonical_sections(sections: &[Section]) -> Vec<&Section> {
    let mut by_name: FxHashMap<&str, usize> = FxHashMap::default();
    let mut deduped: Vec<&Section> = Vec::new();
    for section in sections {
        match by_name.get(section.name.as_str()) {
            Some(&slot) => deduped[slot] = section,
            None => {
                by_name.insert(section.name.as_str(), deduped.len());
                deduped.push(section);
            }
        }
    }

    let rank: FxHashMap<&str, usize> = SECTION_ORDER
        .iter()
        .enumerate()
        .map(|(index, name)| (*name, index))
        .collect();
    deduped.sort_by_key(|section| {
        rank.get(section.name.as_str())
            .copied()
            .unwrap_or(usize::MAX)
    });
    deduped
}
