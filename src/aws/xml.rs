//! Element extraction for query protocol (XML) responses.
//!
//! The query protocol responses we read are shallow: every value we need is
//! the text of a leaf element, so a full XML parser is not required.

use regex::Regex;
use std::sync::LazyLock;

/// A leaf element: open tag, text without markup, close tag.
static LEAF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z][\w.:-]*)>([^<]*)</([A-Za-z][\w.:-]*)>").expect("Invalid regex")
});

/// Text of every `<tag>...</tag>` leaf element, in document order.
pub fn all(body: &str, tag: &str) -> Vec<String> {
    LEAF_RE
        .captures_iter(body)
        .filter(|c| &c[1] == tag && &c[3] == tag)
        .map(|c| unescape(&c[2]))
        .collect()
}

/// Text of the first `<tag>...</tag>` leaf element.
pub fn first(body: &str, tag: &str) -> Option<String> {
    all(body, tag).into_iter().next()
}

/// Inner text of every `<tag>` block, including nested markup.
pub fn blocks<'a>(body: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let mut found = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find(&open) {
        let inner = &rest[start + open.len()..];
        let Some(end) = inner.find(&close) else {
            break;
        };
        found.push(&inner[..end]);
        rest = &inner[end + close.len()..];
    }
    found
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
