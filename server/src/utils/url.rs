//! Listing URL helpers

use std::sync::OnceLock;

use regex::Regex;

/// Remove `/page/N` pagination segments so a submitted filter starts on the
/// first page.
pub fn strip_page_segment(path: &str) -> String {
    static RE_PAGE: OnceLock<Regex> = OnceLock::new();
    let re = RE_PAGE.get_or_init(|| Regex::new(r"/page/[0-9]+").expect("Invalid regex"));
    re.replace_all(path, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_page_segment() {
        assert_eq!(strip_page_segment("/shop/page/3"), "/shop");
        assert_eq!(strip_page_segment("/shop/page/3/"), "/shop/");
        assert_eq!(strip_page_segment("/shop/weight/1-2"), "/shop/weight/1-2");
        assert_eq!(strip_page_segment("/shop/page/next"), "/shop/page/next");
    }
}
