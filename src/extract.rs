use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Body tolerates ESC and brackets so hyperlink escapes copied along with the
// text don't split a URL; the terminator class keeps trailing punctuation out.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:https?://|ftp://|news://|git://|mailto:|file://|www\.)",
        r"[\w\-@;/?:&=%$.+!*'(),~#\x1b\[\]]+",
        r"[\w\-@;/?&=%$+!*'(~]",
    ))
    .expect("url pattern is valid")
});

/// Extract the distinct URL-like substrings of `text`, in order of first appearance.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut urls = Vec::new();
    for m in URL_PATTERN.find_iter(text) {
        let url = m.as_str().trim_end_matches(['\'', '"']);
        if seen.insert(url) {
            urls.push(url.to_string());
        }
    }
    urls
}
