//! Guide document codec.
//!
//! Renders a record as an editable markdown document (front matter, title,
//! blockquote memo, sectioned tables) and parses possibly hand-edited
//! documents back into records.
//!
//! Decoding is best-effort by contract: it always returns a record.
//! Irregularities degrade to advisories on the result instead of errors,
//! so one mangled file can never take down a batch.

use chrono::NaiveDate;

use crate::codec::table;
use crate::model::{canonical_sections, dedup_sections, Record, Section};

pub const FRONT_MATTER_DELIMITER: &str = "---";
const QUOTE_MARKER: char = '>';
const HEADING_PREFIX: &str = "## ";

/// Outcome of front-matter parsing, surfaced to the caller instead of
/// being silently swallowed.
#[derive(Debug, Clone, PartialEq)]
pub enum FrontMatter {
    /// Key/value pairs in document order.
    Parsed(Vec<(String, String)>),
    /// A delimited block was found but yielded no usable pairs; the raw
    /// block text is kept for the caller.
    Unparsed(String),
    /// The document does not begin with the delimiter.
    Absent,
}

/// A decoded document: the best record the text yields, the front-matter
/// outcome, and any advisories the caller may want to log.
#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pub record: Record,
    pub front_matter: FrontMatter,
    pub advisories: Vec<String>,
}

/// Render a record as a guide document.
pub fn encode_document(record: &Record) -> String {
    let updated: String = record.updated_date.chars().take(10).collect();
    let mut out = format!(
        "---\nid: {}\ncompany: {}\ncategory: {}\nproduct_type: {}\nupdated: {}\n---\n\n\
         # {} - {}\n\n",
        record.id,
        record.company,
        record.category,
        record.product_type,
        updated,
        record.company,
        record.product_type,
    );

    if !record.memo.trim().is_empty() {
        let memo_lines: Vec<String> = record
            .memo
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| format!("> {line}"))
            .collect();
        out.push_str(&memo_lines.join("\n"));
        out.push_str("\n\n");
    }

    for section in canonical_sections(&record.sections) {
        if !section.is_emittable() {
            continue;
        }
        out.push_str(&format!("{}{}\n\n", HEADING_PREFIX, section.name));
        out.push_str(&table::encode(&section.fields));
        out.push_str("\n\n");
    }

    out
}

/// Parse a guide document back into a record. Never fails; see
/// [`DecodedDocument`].
pub fn decode_document(text: &str) -> DecodedDocument {
    let mut advisories = Vec::new();
    let mut record = Record::default();

    let (front_matter, body) = split_front_matter(text);
    match &front_matter {
        FrontMatter::Parsed(pairs) => {
            for (key, value) in pairs {
                match key.as_str() {
                    "id" => record.id = value.clone(),
                    "company" => record.company = value.clone(),
                    "category" => record.category = value.clone(),
                    "product_type" => record.product_type = value.clone(),
                    "updated" => record.updated_date = normalize_date(value),
                    other => advisories.push(format!("unknown front-matter key `{other}`")),
                }
            }
        }
        FrontMatter::Unparsed(_) => {
            advisories
                .push("front matter block did not parse; whole document treated as body".into());
        }
        FrontMatter::Absent => {}
    }

    let lines: Vec<&str> = body.lines().collect();
    record.memo = extract_memo(&lines);
    record.sections = dedup_sections(extract_sections(&lines));

    DecodedDocument {
        record,
        front_matter,
        advisories,
    }
}

/// Normalize an updated-date value: when the leading ten characters form a
/// `%Y-%m-%d` calendar date they become the whole value (truncating any
/// time component); other text passes through; absent stays empty.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let head: String = trimmed.chars().take(10).collect();
    if NaiveDate::parse_from_str(&head, "%Y-%m-%d").is_ok() {
        head
    } else {
        trimmed.to_string()
    }
}

/// Split off a leading front-matter block. The body is everything after
/// the closing delimiter, or the whole text when there is no parseable
/// block.
fn split_front_matter(text: &str) -> (FrontMatter, &str) {
    if !text.starts_with(FRONT_MATTER_DELIMITER) {
        return (FrontMatter::Absent, text);
    }
    let mut parts = text.splitn(3, FRONT_MATTER_DELIMITER);
    parts.next(); // empty segment before the opening delimiter
    let (Some(block), Some(body)) = (parts.next(), parts.next()) else {
        return (FrontMatter::Unparsed(text.to_string()), text);
    };
    let pairs = parse_key_values(block);
    if pairs.is_empty() {
        return (FrontMatter::Unparsed(block.to_string()), text);
    }
    (FrontMatter::Parsed(pairs), body)
}

/// Tolerant `key: value` mini-language: one pair per line, surrounding
/// quotes stripped, comment and junk lines skipped.
fn parse_key_values(block: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(colon) = trimmed.find(':') else {
            continue;
        };
        let key = trimmed[..colon].trim();
        if key.is_empty() {
            continue;
        }
        let value = trimmed[colon + 1..].trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);
        pairs.push((key.to_string(), value.to_string()));
    }
    pairs
}

/// The first run of consecutive blockquote lines before any heading, each
/// stripped of its marker and leading space.
fn extract_memo(lines: &[&str]) -> String {
    let mut memo_lines: Vec<String> = Vec::new();
    for line in lines {
        let trimmed = line.trim_start();
        if trimmed.starts_with(HEADING_PREFIX) {
            break;
        }
        if trimmed.starts_with(QUOTE_MARKER) {
            memo_lines.push(trimmed.trim_start_matches(QUOTE_MARKER).trim().to_string());
        } else if !memo_lines.is_empty() {
            break; // first run only
        }
    }
    memo_lines.join("\n")
}

/// Carve the body into heading-delimited runs and decode each run's table
/// block. A heading yielding zero fields contributes no section.
fn extract_sections(lines: &[&str]) -> Vec<Section> {
    let headings: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            line.trim_end()
                .strip_prefix(HEADING_PREFIX)
                .map(|name| (index, name.trim()))
        })
        .collect();

    let mut sections = Vec::new();
    for (position, (start, name)) in headings.iter().enumerate() {
        if name.is_empty() {
            continue;
        }
        let end = headings
            .get(position + 1)
            .map(|(next, _)| *next)
            .unwrap_or(lines.len());
        let content = &lines[start + 1..end];
        let Some((table_start, table_end)) = table::find_table_block(content) else {
            continue;
        };
        let fields = table::decode(&content[table_start..table_end]);
        if fields.is_empty() {
            continue;
        }
        sections.push(Section {
            name: name.to_string(),
            fields,
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn sample_record() -> Record {
        Record {
            id: "7".to_string(),
            company: "ABank".to_string(),
            category: "Personal".to_string(),
            product_type: "Credit".to_string(),
            updated_date: "2025-03-01".to_string(),
            memo: "Line1\nLine2".to_string(),
            sections: vec![Section {
                name: "Basic".to_string(),
                fields: vec![Field {
                    name: "Target".to_string(),
                    detail: "Employed".to_string(),
                }],
            }],
        }
    }

    #[test]
    fn test_encode_shape() {
        let doc = encode_document(&sample_record());
        assert!(doc.starts_with("---\nid: 7\n"));
        assert!(doc.contains("# ABank - Credit"));
        assert!(doc.contains("> Line1\n> Line2"));
        assert!(doc.contains("## Basic"));
        assert!(doc.contains("| Target | Employed |"));
    }

    #[test]
    fn test_round_trip_reproduces_record() {
        let record = sample_record();
        let decoded = decode_document(&encode_document(&record));
        assert_eq!(decoded.record, record);
        assert!(decoded.advisories.is_empty());
        assert!(matches!(decoded.front_matter, FrontMatter::Parsed(_)));
    }

    #[test]
    fn test_missing_front_matter_degrades_to_body() {
        let doc = "# Just a title\n\n## Basic\n\n| Field | Detail |\n|---|---|\n| a | 1 |\n";
        let decoded = decode_document(doc);
        assert_eq!(decoded.front_matter, FrontMatter::Absent);
        assert_eq!(decoded.record.company, "");
        assert_eq!(decoded.record.sections.len(), 1);
        assert_eq!(decoded.record.sections[0].fields[0].name, "a");
    }

    #[test]
    fn test_garbage_front_matter_is_unparsed_not_fatal() {
        let doc = "---\n????\n---\n\n## Basic\n\n| Field | Detail |\n|---|---|\n| a | 1 |\n";
        let decoded = decode_document(doc);
        assert!(matches!(decoded.front_matter, FrontMatter::Unparsed(_)));
        assert_eq!(decoded.advisories.len(), 1);
        // body still parsed from the full text
        assert_eq!(decoded.record.sections.len(), 1);
    }

    #[test]
    fn test_unterminated_front_matter() {
        let decoded = decode_document("---\nid: 9\ncompany: ABank");
        assert!(matches!(decoded.front_matter, FrontMatter::Unparsed(_)));
        assert_eq!(decoded.record.company, "");
    }

    #[test]
    fn test_quoted_values_and_junk_lines() {
        let doc = "---\nid: \"42\"\ncompany: 'ABank'\n!!!\nupdated: 2025-01-02\n---\nbody";
        let decoded = decode_document(doc);
        assert_eq!(decoded.record.id, "42");
        assert_eq!(decoded.record.company, "ABank");
        assert_eq!(decoded.record.updated_date, "2025-01-02");
    }

    #[test]
    fn test_unknown_key_becomes_advisory() {
        let doc = "---\ncompany: ABank\nfavorite_color: blue\n---\nbody";
        let decoded = decode_document(doc);
        assert_eq!(decoded.record.company, "ABank");
        assert_eq!(decoded.advisories.len(), 1);
        assert!(decoded.advisories[0].contains("favorite_color"));
    }

    #[test]
    fn test_date_normalization() {
        assert_eq!(normalize_date("2025-03-01 10:33:00"), "2025-03-01");
        assert_eq!(normalize_date("2025-03-01"), "2025-03-01");
        assert_eq!(normalize_date("sometime last spring"), "sometime last spring");
        assert_eq!(normalize_date("   "), "");
    }

    #[test]
    fn test_memo_stops_at_first_gap() {
        let doc = "---\ncompany: A\n---\n\n# A - B\n\n> first\n> second\n\nprose\n\n> not memo\n";
        let decoded = decode_document(doc);
        assert_eq!(decoded.record.memo, "first\nsecond");
    }

    #[test]
    fn test_duplicate_headings_later_wins_earlier_position() {
        let doc = "---\ncompany: A\n---\n\
                   ## Fees\n\n| Field | Detail |\n|---|---|\n| old | 1 |\n\n\
                   ## Basic Info\n\n| Field | Detail |\n|---|---|\n| b | 2 |\n\n\
                   ## Fees\n\n| Field | Detail |\n|---|---|\n| new | 3 |\n";
        let decoded = decode_document(doc);
        let names: Vec<&str> = decoded
            .record
            .sections
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Fees", "Basic Info"]);
        assert_eq!(decoded.record.sections[0].fields[0].name, "new");
    }

    #[test]
    fn test_heading_without_table_contributes_nothing() {
        let doc = "---\ncompany: A\n---\n\n## Notes\n\nJust prose here.\n";
        let decoded = decode_document(doc);
        assert!(decoded.record.sections.is_empty());
    }

    #[test]
    fn test_empty_record_encodes_minimal_document() {
        let record = Record {
            company: "Solo".to_string(),
            ..Record::default()
        };
        let doc = encode_document(&record);
        let decoded = decode_document(&doc);
        assert_eq!(decoded.record, record);
    }
}
