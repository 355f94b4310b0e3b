//! Filesystem projection for guide documents.
//!
//! Pure functions from record attributes to tree-relative paths. Two
//! records with the same category/company/product type project to the
//! same path; the export driver lets the last write win.

use crate::model::Record;

pub const GUIDE_EXTENSION: &str = "md";

/// Characters that cannot appear in a path segment on any supported
/// platform.
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Sanitize human text into a safe path segment: strip illegal characters,
/// collapse whitespace runs, turn `(` into `-` and drop `)`, collapse
/// repeated hyphens, trim edge hyphens.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let hyphenated = collapsed.replace('(', "-").replace(')', "");

    let mut out = String::with_capacity(hyphenated.len());
    let mut previous_was_hyphen = false;
    for c in hyphenated.chars() {
        if c == '-' {
            if !previous_was_hyphen {
                out.push('-');
            }
            previous_was_hyphen = true;
        } else {
            out.push(c);
            previous_was_hyphen = false;
        }
    }
    out.trim_matches('-').to_string()
}

/// Tree-relative path for a record's document:
/// `{category}/{company}/{product type}.md` with the two human-entered
/// segments sanitized.
pub fn path_for(record: &Record) -> String {
    format!(
        "{}/{}/{}.{}",
        record.category,
        sanitize(&record.company),
        sanitize(&record.product_type),
        GUIDE_EXTENSION
    )
}
