//! Table-cell text codec.
//!
//! Markdown table cells cannot hold raw newlines or unescaped pipes.
//! Multi-line detail text is flattened to a `<br>`-joined single line with
//! `\|` escapes before it enters a row, and restored on the way out.

/// Single-character stand-in for a line break inside a cell.
pub const LINE_BREAK_MARKER: &str = "<br>";

/// Flatten multi-line text into a table-cell-safe single line.
///
/// Splits on any newline variant, drops lines that are empty after
/// trimming, joins the rest with [`LINE_BREAK_MARKER`], then escapes every
/// literal pipe so it cannot open a table column. Whitespace-only input
/// encodes to the empty string.
pub fn encode(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let joined = normalized
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(LINE_BREAK_MARKER);
    joined.replace('|', "\\|")
}

/// Restore cell text: unescape `\|` first, then split the line-break
/// marker back into real newlines.
pub fn decode(cell: &str) -> String {
    cell.replace("\\|", "|")
        .split(LINE_BREAK_MARKER)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_round_trip() {
        let text = "First line\nSecond line\nThird";
        let encoded = encode(text);
        assert_eq!(encoded, "First line<br>Second line<br>Third");
        assert_eq!(decode(&encoded), text);
    }

    #[test]
    fn test_windows_and_bare_cr_line_endings() {
        assert_eq!(encode("a\r\nb\rc"), "a<br>b<br>c");
    }

    #[test]
    fn test_blank_lines_dropped_and_trimmed() {
        assert_eq!(encode("  a  \n\n   \n b "), "a<br>b");
        assert_eq!(decode(&encode("  a  \n\n   \n b ")), "a\nb");
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert_eq!(encode(""), "");
        assert_eq!(encode("  \n \r\n "), "");
        assert_eq!(decode(""), "");
    }

    #[test]
    fn test_pipe_escaping() {
        assert_eq!(encode("a|b"), "a\\|b");
        assert_eq!(decode("a\\|b"), "a|b");
    }

    #[test]
    fn test_idempotent_on_normalized_text() {
        // decode(encode(t)) equals t once t has no blank lines, no edge
        // whitespace, and unix line endings
        for text in ["single", "a|b\nc", "one\ntwo\nthree"] {
            assert_eq!(decode(&encode(text)), text);
        }
    }
}
