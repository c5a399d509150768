//! Category tree lookup, resilient to URL-encoding variants.
//!
//! Category slugs reach the frontend in several shapes: as stored
//! (`"swim caps"`), dash-joined from a URL path (`"swim-caps"`), or
//! percent-encoded (`"swim%20caps"`, sometimes with lowercase hex). The
//! resolver expands the requested slug into all known variants and matches
//! a node if its stored slug equals any of them.

use caspian_core::CategoryId;

use crate::shop::types::Category;

/// The encoding variants of one requested slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugVariants {
    /// The slug exactly as requested.
    pub original: String,
    /// Percent-decoded, dashes replaced with spaces.
    pub normalized: String,
    /// Percent-encoding of the normalized form (uppercase hex).
    pub encoded: String,
    /// Same, with the hex digits of each escape lowercased.
    pub encoded_lower: String,
    /// Percent-encoded with `%20` replaced by `-`.
    pub dashed: String,
}

impl SlugVariants {
    /// Expand a requested slug into all matchable variants.
    ///
    /// Normalization percent-decodes the request first, then replaces
    /// dashes with spaces, so `"swim-caps"` and `"swim%20caps"` normalize
    /// to the same `"swim caps"`. A request that fails to decode is
    /// normalized as-is.
    #[must_use]
    pub fn new(slug: &str) -> Self {
        let decoded = urlencoding::decode(slug)
            .map_or_else(|_| slug.to_string(), std::borrow::Cow::into_owned);
        let normalized = decoded.replace('-', " ");
        let encoded = urlencoding::encode(&normalized).into_owned();
        let encoded_lower = lowercase_escapes(&encoded);
        let dashed = encoded.replace("%20", "-");

        Self {
            original: slug.to_string(),
            normalized,
            encoded,
            encoded_lower,
            dashed,
        }
    }

    /// Whether a stored slug matches any variant.
    ///
    /// Equality against the original/encoded/lowercase-encoded/dashed forms,
    /// or the stored slug percent-decoding to the normalized form. A stored
    /// slug that fails to decode simply doesn't match that way.
    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        if stored == self.original
            || stored == self.encoded
            || stored == self.encoded_lower
            || stored == self.dashed
        {
            return true;
        }

        urlencoding::decode(stored).is_ok_and(|decoded| decoded == self.normalized)
    }
}

/// Lowercase the two hex digits of each percent escape, leaving literal
/// characters alone.
fn lowercase_escapes(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut chars = encoded.chars();

    while let Some(c) = chars.next() {
        out.push(c);
        if c == '%' {
            for _ in 0..2 {
                if let Some(hex) = chars.next() {
                    out.push(hex.to_ascii_lowercase());
                }
            }
        }
    }

    out
}

/// Find the category matching a slug.
///
/// Top-level categories are the common case; they are scanned first so they
/// resolve without a full tree walk. Only then does a pre-order depth-first
/// search cover the entire tree. Matches are assumed unique by slug, so the
/// ordering is a shortcut, not a semantic choice.
#[must_use]
pub fn find_by_slug<'a>(roots: &'a [Category], slug: &str) -> Option<&'a Category> {
    let variants = SlugVariants::new(slug);

    if let Some(root) = roots.iter().find(|node| variants.matches(&node.slug)) {
        return Some(root);
    }

    roots
        .iter()
        .find_map(|node| find_in_subtree(node, &variants))
}

fn find_in_subtree<'a>(node: &'a Category, variants: &SlugVariants) -> Option<&'a Category> {
    if variants.matches(&node.slug) {
        return Some(node);
    }

    node.children
        .iter()
        .find_map(|child| find_in_subtree(child, variants))
}

/// Find the category with an exact id, pre-order depth-first.
#[must_use]
pub fn find_by_id(roots: &[Category], id: CategoryId) -> Option<&Category> {
    roots.iter().find_map(|node| find_id_in_subtree(node, id))
}

fn find_id_in_subtree(node: &Category, id: CategoryId) -> Option<&Category> {
    if node.id == id {
        return Some(node);
    }

    node.children
        .iter()
        .find_map(|child| find_id_in_subtree(child, id))
}
