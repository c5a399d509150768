//! Resolving an attribute selection to a concrete variation.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use caspian_core::AttributeTypeId;

use crate::shop::types::Variation;

/// The user's current choice of attribute values: at most one slug per
/// facet. May be partial while the user is still picking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSelection {
    chosen: BTreeMap<AttributeTypeId, String>,
}

impl AttributeSelection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a value for a facet, replacing any previous choice.
    pub fn choose(&mut self, type_id: AttributeTypeId, slug: impl Into<String>) {
        self.chosen.insert(type_id, slug.into());
    }

    /// Drop the choice for a facet.
    pub fn unset(&mut self, type_id: AttributeTypeId) {
        self.chosen.remove(&type_id);
    }

    /// The chosen slug for a facet, if any.
    #[must_use]
    pub fn get(&self, type_id: AttributeTypeId) -> Option<&str> {
        self.chosen.get(&type_id).map(String::as_str)
    }

    /// Number of facets with a choice.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    /// Whether no facet has a choice yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Iterate over `(facet, slug)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeTypeId, &str)> {
        self.chosen.iter().map(|(id, slug)| (*id, slug.as_str()))
    }
}

impl FromIterator<(AttributeTypeId, String)> for AttributeSelection {
    fn from_iter<I: IntoIterator<Item = (AttributeTypeId, String)>>(iter: I) -> Self {
        Self {
            chosen: iter.into_iter().collect(),
        }
    }
}

/// Whether a variation satisfies every constraint the selection specifies.
///
/// Facets absent from the selection are unconstrained.
#[must_use]
pub fn matches(selection: &AttributeSelection, variation: &Variation) -> bool {
    selection.iter().all(|(type_id, slug)| {
        variation
            .attributes
            .iter()
            .any(|attr| attr.type_id == type_id && attr.slug == slug)
    })
}

/// Resolve a selection to the first variation, in source order, that
/// satisfies all of its constraints.
///
/// Source order is the backend's order; when the selection pins every facet
/// the match is unique by the variation invariants, so "first" is simply
/// "the" match. `None` is the expected no-selection state while a partial
/// selection does not yet pin a variation, not an error.
#[must_use]
pub fn resolve<'a>(
    selection: &AttributeSelection,
    variations: &'a [Variation],
) -> Option<&'a Variation> {
    variations
        .iter()
        .find(|variation| matches(selection, variation))
}

/// Slugs carried by any in-stock variation.
///
/// The baseline "available" set shown before the user has chosen anything.
#[must_use]
pub fn in_stock_slugs(variations: &[Variation]) -> BTreeSet<String> {
    variations
        .iter()
        .filter(|variation| variation.in_stock)
        .flat_map(|variation| variation.attributes.iter().map(|attr| attr.slug.clone()))
        .collect()
}

/// Which attribute values remain selectable after choosing one value.
///
/// The union of (a) every value carried by a variation that also carries
/// the chosen value, and (b) every other value in the chosen value's own
/// facet, so the user can always switch within that facet.
///
/// This is a reachability heuristic, not a per-combination stock check: it
/// only follows variations that include the just-chosen value and does not
/// simulate further combinations.
#[must_use]
pub fn selectable_slugs(variations: &[Variation], chosen_slug: &str) -> BTreeSet<String> {
    let mut selectable = BTreeSet::new();

    // (a) values reachable through variations carrying the chosen value
    for variation in variations {
        if variation.attributes.iter().any(|attr| attr.slug == chosen_slug) {
            selectable.extend(variation.attributes.iter().map(|attr| attr.slug.clone()));
        }
    }

    // (b) siblings within the chosen value's facet
    let chosen_facet = variations
        .iter()
        .flat_map(|variation| variation.attributes.iter())
        .find(|attr| attr.slug == chosen_slug)
        .map(|attr| attr.type_id);

    if let Some(type_id) = chosen_facet {
        selectable.extend(
            variations
                .iter()
                .flat_map(|variation| variation.attributes.iter())
                .filter(|attr| attr.type_id == type_id)
                .map(|attr| attr.slug.clone()),
        );
    }

    selectable
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use caspian_core::VariationId;
    use rust_decimal::Decimal;

    use crate::shop::types::{AttributeOptions, ProductAttribute};

    const COLOR: i64 = 2;
    const SIZE: i64 = 3;

    fn attr(type_id: i64, slug: &str) -> ProductAttribute {
        ProductAttribute {
            name: None,
            kind: String::new(),
            type_id: AttributeTypeId::new(type_id),
            slug: slug.to_string(),
            value: None,
            input: None,
            options: AttributeOptions::default(),
            in_stock: None,
        }
    }

    fn variation(id: i64, attrs: Vec<ProductAttribute>, in_stock: bool) -> Variation {
        Variation {
            id: VariationId::new(id),
            attributes: attrs,
            in_stock,
            stock_quantity: 1,
            images: vec![],
            price: Decimal::from(1_000_000),
            sale_price: None,
            sku: None,
        }
    }

    fn caps() -> Vec<Variation> {
        vec![
            variation(1, vec![attr(COLOR, "red"), attr(SIZE, "l")], true),
            variation(2, vec![attr(COLOR, "red"), attr(SIZE, "xl")], false),
            variation(3, vec![attr(COLOR, "blue"), attr(SIZE, "l")], true),
        ]
    }

    fn selection(pairs: &[(i64, &str)]) -> AttributeSelection {
        pairs
            .iter()
            .map(|&(id, slug)| (AttributeTypeId::new(id), slug.to_string()))
            .collect()
    }

    #[test]
    fn test_full_selection_resolves_unique_variation() {
        let caps = caps();
        let resolved = resolve(&selection(&[(COLOR, "red"), (SIZE, "xl")]), &caps).unwrap();
        assert_eq!(resolved.id, VariationId::new(2));
    }

    #[test]
    fn test_partial_selection_leaves_other_facets_unconstrained() {
        // only the color is pinned; the first red variation in source order wins
        let variations = caps();
        let resolved = resolve(&selection(&[(COLOR, "red")]), &variations).unwrap();
        assert_eq!(resolved.id, VariationId::new(1));

        let resolved = resolve(&selection(&[(SIZE, "xl")]), &variations).unwrap();
        assert_eq!(resolved.id, VariationId::new(2));
    }

    #[test]
    fn test_unsatisfiable_selection_is_no_selection() {
        assert!(resolve(&selection(&[(COLOR, "green")]), &caps()).is_none());
        assert!(resolve(&selection(&[(COLOR, "blue"), (SIZE, "xl")]), &caps()).is_none());
    }

    #[test]
    fn test_empty_selection_matches_first_variation() {
        let variations = caps();
        let resolved = resolve(&AttributeSelection::new(), &variations).unwrap();
        assert_eq!(resolved.id, VariationId::new(1));
    }

    #[test]
    fn test_selection_replaces_choice_within_facet() {
        let mut sel = AttributeSelection::new();
        sel.choose(AttributeTypeId::new(COLOR), "red");
        sel.choose(AttributeTypeId::new(COLOR), "blue");
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.get(AttributeTypeId::new(COLOR)), Some("blue"));

        sel.unset(AttributeTypeId::new(COLOR));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_in_stock_slugs_baseline() {
        let slugs = in_stock_slugs(&caps());
        // variation 2 (red/xl) is out of stock; red and l survive via others
        assert!(slugs.contains("red"));
        assert!(slugs.contains("blue"));
        assert!(slugs.contains("l"));
        assert!(!slugs.contains("xl"));
    }

    #[test]
    fn test_selectable_after_choosing_color() {
        let slugs = selectable_slugs(&caps(), "blue");
        // reachable through the blue variation: blue, l
        assert!(slugs.contains("l"));
        // same-facet siblings stay switchable
        assert!(slugs.contains("red"));
        // xl is only reachable via red and is not a color sibling
        assert!(!slugs.contains("xl"));
    }

    #[test]
    fn test_selectable_after_choosing_size() {
        let slugs = selectable_slugs(&caps(), "xl");
        assert!(slugs.contains("red"));
        assert!(slugs.contains("l"), "size siblings remain selectable");
        assert!(!slugs.contains("blue"), "blue is not reachable via xl");
    }

    #[test]
    fn test_selectable_for_unknown_slug_is_empty() {
        assert!(selectable_slugs(&caps(), "green").is_empty());
    }
}
