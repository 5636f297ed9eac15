//! Query text normalization.
//!
//! The editor holds free-form text that may include `#` comment lines and
//! blank lines. Only the remaining lines are sent to the backend or used as
//! an offline filter.

/// Lines whose trimmed form starts with this marker are comments.
pub const COMMENT_MARKER: char = '#';

/// Default query used when live mode runs with no query text.
pub const DEFAULT_LIVE_QUERY: &str = "fetch logs";

/// Strip comment and blank lines, keep the rest in order, trim the result.
///
/// Text made only of comments and blank lines normalizes to `""`, which
/// callers treat as "no query".
pub fn normalize(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with(COMMENT_MARKER)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Whether the text contains anything besides comments and blank lines.
pub fn has_actual_query(text: &str) -> bool {
    !normalize(text).is_empty()
}

/// Comment preamble placed in the editor at startup.
pub fn editor_preamble(offline: bool) -> String {
    if offline {
        [
            "# Development mode - using dummy data",
            "# Enter a search term here to filter the sample logs...",
            "# Use Ctrl+R to run",
        ]
        .join("\n")
    } else {
        [
            "# Connected to Dynatrace API",
            "# Enter your DQL query here...",
            "# Use Ctrl+R to run",
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_comments_and_blank_lines() {
        let text = "# comment\n\nfetch logs\n  # indented comment\n| filter loglevel == \"ERROR\"\n\n";
        assert_eq!(
            normalize(text),
            "fetch logs\n| filter loglevel == \"ERROR\""
        );
    }

    #[test]
    fn test_only_comments_is_empty() {
        assert_eq!(normalize("# a\n#b\n   \n"), "");
        assert!(!has_actual_query("# a\n\n"));
    }

    #[test]
    fn test_preserves_inner_indentation_and_trims_ends() {
        assert_eq!(normalize("  payment  \n"), "payment");
        assert_eq!(normalize("a\n  b"), "a\n  b");
    }

    #[test]
    fn test_preamble_normalizes_to_no_query() {
        assert!(!has_actual_query(&editor_preamble(true)));
        assert!(!has_actual_query(&editor_preamble(false)));
    }
}
