//! HTML text helpers for server-rendered pages

use std::sync::OnceLock;

use regex::Regex;

/// Escape text for use in HTML element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove markup tags, keeping the text between them.
///
/// An unterminated trailing tag is dropped along with everything after it.
pub fn strip_tags(text: &str) -> String {
    static RE_TAG: OnceLock<Regex> = OnceLock::new();
    let re = RE_TAG.get_or_init(|| Regex::new(r"<[^>]*(>|$)").expect("Invalid regex"));
    re.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
        assert_eq!(escape("Weight"), "Weight");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Weight</b> filter"), "Weight filter");
        assert_eq!(strip_tags("Size <script>alert(1)</script>"), "Size alert(1)");
        assert_eq!(strip_tags("Price <em"), "Price ");
        assert_eq!(strip_tags("1 < 2"), "1 ");
    }
}
