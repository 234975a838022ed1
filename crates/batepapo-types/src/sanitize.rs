//! Sanitize-on-write for user-supplied text.
//!
//! Every name and message body is passed through [`sanitize`] before it is
//! validated or stored, so the log never holds raw markup.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

/// Strip HTML tags and surrounding whitespace.
pub fn sanitize(input: &str) -> String {
    TAG_RE.replace_all(input, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(sanitize("  hello  "), "hello");
    }

    #[test]
    fn test_tags_are_removed() {
        assert_eq!(sanitize("<b>bold</b> move"), "bold move");
        assert_eq!(sanitize("<script>alert(1)</script>"), "alert(1)");
        assert_eq!(sanitize("<a\nhref='x'>link</a>"), "link");
    }

    #[test]
    fn test_markup_only_becomes_empty() {
        assert_eq!(sanitize("<br/>  <hr>"), "");
    }

    #[test]
    fn test_lone_angle_brackets_survive() {
        assert_eq!(sanitize("1 < 2"), "1 < 2");
    }
}
