//! Small HTML helpers for backend-supplied rich text.
//!
//! The backend sends product descriptions and excerpts as HTML fragments.
//! These helpers are total functions: any input yields a string, never an
//! error.

use std::sync::OnceLock;

use regex::Regex;

static TAG_RE: OnceLock<Regex> = OnceLock::new();
static ANCHOR_RE: OnceLock<Regex> = OnceLock::new();
static LIST_ITEM_RE: OnceLock<Regex> = OnceLock::new();

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static pattern compiles"))
}

fn anchor_re() -> &'static Regex {
    ANCHOR_RE.get_or_init(|| {
        Regex::new(r#"<a\s[^>]*href\s*=\s*["']([^"']*)["']"#).expect("static pattern compiles")
    })
}

fn list_item_re() -> &'static Regex {
    LIST_ITEM_RE.get_or_init(|| Regex::new(r"(?s)<li[\s>].*?</li>").expect("static pattern compiles"))
}

/// Remove all HTML tags from a string.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    tag_re().replace_all(html, "").into_owned()
}

/// A link pulled out of an HTML fragment, plus the fragment without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// The first anchor's href, if any anchor exists.
    pub link: Option<String>,
    /// The fragment with the link's enclosing `<li>` removed (when the
    /// anchor sat inside one) and `&nbsp;` entities stripped.
    pub html: String,
}

/// Extract the first link from an HTML fragment.
///
/// Mirrors how product excerpts embed a size-guide link: the anchor lives in
/// a list item that should disappear from the rendered excerpt once the
/// link has been pulled out.
#[must_use]
pub fn extract_link(html: &str) -> ExtractedLink {
    let link = anchor_re()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let mut cleaned = html.to_string();
    if link.is_some() {
        // drop the first list item that contains the anchor
        if let Some(item) = list_item_re()
            .find_iter(html)
            .find(|item| anchor_re().is_match(item.as_str()))
        {
            cleaned.replace_range(item.range(), "");
        }
    }
    cleaned = cleaned.replace("&nbsp;", "");

    ExtractedLink {
        link,
        html: cleaned,
    }
}
